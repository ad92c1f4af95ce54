use clap::{Parser, Subcommand};
use log::info;
use rulesheet_lib::host::memory::{HostQuirks, MemoryHost};
use rulesheet_lib::style::property_names::to_camel_case;
use rulesheet_lib::{PropertyMap, Resolved, RuleSheet, RuleSheetOptions, SheetError};
use std::fs;
use std::process;

#[derive(Parser)]
#[command(name = "rulesheet")]
#[command(about = "Read and edit CSS rules by selector")]
struct Args {
    /// CSS file loaded as the managed sheet.
    input: String,

    /// Extra read-only sheets, consulted by `get-all` and `get-property`.
    #[arg(long = "sheet")]
    sheets: Vec<String>,

    /// Identifier of the node owning the managed sheet.
    #[arg(long, default_value = rulesheet_lib::DEFAULT_OWNER_ID)]
    owner_id: String,

    /// Behave like a host that only accepts `:before`-style pseudo-elements.
    #[arg(long)]
    legacy_pseudo: bool,

    /// Behave like a host that reports `.a.b` as `.b.a`.
    #[arg(long)]
    swap_order: bool,

    /// Print property names in camelCase.
    #[arg(long)]
    camel_case: bool,

    /// Write the managed sheet here after a mutating command instead of stdout.
    #[arg(short, long)]
    output: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Declarations of one selector, or of every selector, in the managed sheet.
    Get { selector: Option<String> },
    /// Declarations of one selector across every sheet.
    GetAll { selector: String },
    /// One property across every sheet, rebuilding shorthands.
    GetProperty { selector: String, property: String },
    /// Set declarations given as `name=value`.
    Set {
        selector: String,
        #[arg(required = true)]
        declarations: Vec<String>,
    },
    SetProperty {
        selector: String,
        property: String,
        value: String,
    },
    /// Delete the rules of one selector, or the whole managed sheet.
    Remove { selector: Option<String> },
    RemoveProperty { selector: String, property: String },
    /// Print every sheet.
    Export,
}

fn read_css(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(css) => css,
        Err(e) => {
            eprintln!("Error reading CSS file {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn load(args: &Args) -> Result<RuleSheet<MemoryHost>, SheetError> {
    let mut host = MemoryHost::with_quirks(HostQuirks {
        legacy_pseudo_only: args.legacy_pseudo,
        swap_compound_order: args.swap_order,
        ..HostQuirks::default()
    });
    for path in &args.sheets {
        host.add_sheet_from_css(&read_css(path), Some(path), None)?;
    }
    host.add_sheet_from_css(&read_css(&args.input), Some(&args.input), Some(&args.owner_id))?;
    info!("loaded {} sheet(s)", args.sheets.len() + 1);

    let options = RuleSheetOptions {
        owner_id: args.owner_id.clone(),
    };
    Ok(RuleSheet::with_options(host, options))
}

fn print_properties(map: &PropertyMap, camel_case: bool, indent: &str) {
    for (name, value) in map {
        let name = if camel_case {
            to_camel_case(name)
        } else {
            name.clone()
        };
        println!("{}{}: {};", indent, name, value);
    }
}

fn parse_declaration(text: &str) -> Result<(&str, &str), SheetError> {
    text.split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .ok_or_else(|| SheetError::Css(format!("expected name=value, got `{}`", text)))
}

fn write_managed(sheet: &RuleSheet<MemoryHost>, args: &Args) {
    let text: String = sheet
        .export_sheets()
        .into_iter()
        .filter(|s| s.owner_id.as_deref() == Some(args.owner_id.as_str()))
        .map(|s| s.text)
        .collect();
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, text) {
                eprintln!("Error writing {}: {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", text),
    }
}

fn run(args: &Args) -> Result<(), SheetError> {
    let mut sheet = load(args)?;

    match &args.command {
        Command::Get {
            selector: Some(selector),
        } => print_properties(&sheet.get(selector), args.camel_case, ""),
        Command::Get { selector: None } => {
            for (selector, map) in sheet.get_selectors() {
                println!("{} {{", selector);
                print_properties(&map, args.camel_case, "  ");
                println!("}}");
            }
        }
        Command::GetAll { selector } => {
            print_properties(&sheet.get_all(selector), args.camel_case, "")
        }
        Command::GetProperty { selector, property } => {
            match sheet.get_property(selector, property) {
                Resolved::Partial { value, dropped } => {
                    println!("{}", value);
                    eprintln!("warning: {} not representable in this shorthand", dropped.join(", "));
                }
                Resolved::Unsupported(raw) => {
                    println!("{}", raw.unwrap_or_default());
                    eprintln!("warning: `{}` is not expanded from longhands", property);
                }
                other => {
                    if let Some(value) = other.value() {
                        println!("{}", value);
                    }
                }
            }
        }
        Command::Set {
            selector,
            declarations,
        } => {
            let parsed = declarations
                .iter()
                .map(|d| parse_declaration(d))
                .collect::<Result<Vec<_>, _>>()?;
            sheet.set(selector, parsed)?;
            write_managed(&sheet, args);
        }
        Command::SetProperty {
            selector,
            property,
            value,
        } => {
            sheet.set_property(selector, property, value)?;
            write_managed(&sheet, args);
        }
        Command::Remove { selector } => {
            let removed = sheet.remove(selector.as_deref())?;
            eprintln!("removed {} rule(s)", removed);
            if selector.is_some() {
                write_managed(&sheet, args);
            }
        }
        Command::RemoveProperty { selector, property } => {
            let cleared = sheet.remove_property(selector, property)?;
            eprintln!("cleared {} declaration(s)", cleared);
            write_managed(&sheet, args);
        }
        Command::Export => {
            for exported in sheet.export_sheets() {
                println!(
                    "/* {} (owner: {}) */",
                    exported.url.as_deref().unwrap_or("<inline>"),
                    exported.owner_id.as_deref().unwrap_or("-")
                );
                print!("{}", exported.text);
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
