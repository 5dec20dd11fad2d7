//! Command-line interface for hoteldir

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use hoteldir::{convert_to_json, fetch, validate, Result};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "hoteldir")]
#[command(author, version, about = "Hotel directory XML validation and JSON conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the fixed pipeline: validate the primary document, validate the
    /// error-sample document, then convert a document to JSON
    Run {
        /// Locator of the primary XML document (URL or path)
        #[arg(value_name = "XML")]
        xml: String,

        /// Locator of the error-sample XML document
        #[arg(value_name = "ERRORS_XML")]
        errors_xml: String,

        /// Locator of the XSD schema
        #[arg(value_name = "XSD")]
        xsd: String,

        /// Document to convert to JSON (defaults to the primary document)
        #[arg(short, long, value_name = "FILE")]
        convert: Option<String>,
    },

    /// Validate an XML document against an XSD schema
    Validate {
        /// Locator of the XSD schema
        #[arg(short, long, value_name = "XSD")]
        schema: String,

        /// Locator of the XML document to validate
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Convert a hotel XML document to JSON
    #[command(name = "xml2json")]
    XmlToJson {
        /// Locator of the XML document to convert
        #[arg(value_name = "FILE")]
        file: String,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            xml,
            errors_xml,
            xsd,
            convert,
        } => cmd_run(&xml, &errors_xml, &xsd, convert.as_deref()),
        Commands::Validate { schema, file } => cmd_validate(&schema, &file),
        Commands::XmlToJson { file } => cmd_xml2json(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_run(xml: &str, errors_xml: &str, xsd: &str, convert: Option<&str>) -> Result<()> {
    let xsd_text = fetch(xsd)?;

    let xml_text = fetch(xml)?;
    println!("{}", validate(&xml_text, &xsd_text).render());

    let errors_text = fetch(errors_xml)?;
    println!("{}", validate(&errors_text, &xsd_text).render());

    let convert_text = match convert {
        Some(locator) => fetch(locator)?,
        None => xml_text,
    };
    println!("{}", convert_to_json(&convert_text)?);

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_validate(schema: &str, file: &str) -> Result<()> {
    let xsd_text = fetch(schema)?;
    let xml_text = fetch(file)?;
    println!("{}", validate(&xml_text, &xsd_text).render());
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_xml2json(file: &str) -> Result<()> {
    let xml_text = fetch(file)?;
    println!("{}", convert_to_json(&xml_text)?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
