// invoice-offer-pdf: Generate invoices and price offers as PDF

use clap::{Args, Parser, Subcommand, ValueEnum};
use invoice_offer_pdf::auth::{hash_password, Account};
use invoice_offer_pdf::config::{load_company_profile, load_document};
use invoice_offer_pdf::logo::LogoAccess;
use invoice_offer_pdf::model::ProfileField;
use invoice_offer_pdf::pdf::{pdf_bytes, save_pdf};
use invoice_offer_pdf::server::{self, AppState};
use invoice_offer_pdf::totals::{format_amount, grand_total};
use invoice_offer_pdf::{AppError, Document, DocumentKind, Salutation};
use log::{info, warn};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate invoices and price offers as PDF")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an invoice (rechnung.pdf)
    Invoice(DocumentArgs),
    /// Generate a price offer (angebot.pdf)
    Offer(DocumentArgs),
    /// Run the login and document API server
    Serve(ServeArgs),
    /// Print the Argon2 hash of a login password
    HashPassword {
        password: String,
    },
}

#[derive(Args, Debug)]
struct DocumentArgs {
    /// Document JSON file (recipient, number, project, date, items, logo)
    #[arg(short, long)]
    input: Option<String>,

    /// Company profile JSON file
    #[arg(short, long, env = "COMPANY_PROFILE")]
    company: Option<String>,

    /// Overrides one company profile field for this document, e.g. "phone=0171 1234567"
    #[arg(long = "company-field", value_name = "FIELD=VALUE", value_parser = parse_company_field)]
    company_fields: Vec<(ProfileField, String)>,

    /// Logo image (data URI, file path or URL), replaces the document's logo
    #[arg(long)]
    logo: Option<String>,

    /// Appends a line: "description;quantity;price", or "#Category"
    #[arg(long = "line")]
    lines: Vec<String>,

    /// Inserts a line at a 0-based position, after all --line rows: "2:#Küche"
    #[arg(long = "insert-line", value_name = "POS:LINE", value_parser = parse_positioned_line)]
    insert_lines: Vec<(usize, String)>,

    /// Removes the line at a 0-based position, after insertions
    #[arg(long = "remove-line", value_name = "POS")]
    remove_lines: Vec<usize>,

    /// Invoice or offer number
    #[arg(short, long)]
    number: Option<String>,

    /// Project name
    #[arg(short, long)]
    project: Option<String>,

    /// Issue date (defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Recipient salutation
    #[arg(long, value_enum)]
    salutation: Option<SalutationArg>,

    /// Recipient name
    #[arg(short, long)]
    recipient: Option<String>,

    /// Recipient address, lines separated by "\n"
    #[arg(short, long)]
    address: Option<String>,

    /// Output filename (defaults to rechnung.pdf or angebot.pdf)
    #[arg(short, long)]
    output: Option<String>,

    /// Write the PDF to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SalutationArg {
    Herr,
    Frau,
}

impl From<SalutationArg> for Salutation {
    fn from(arg: SalutationArg) -> Self {
        match arg {
            SalutationArg::Herr => Salutation::Herr,
            SalutationArg::Frau => Salutation::Frau,
        }
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Login username
    #[arg(long, env = "LOGIN_USERNAME", default_value = "admin")]
    username: String,

    /// Argon2 PHC hash of the login password (see `hash-password`)
    #[arg(long, env = "LOGIN_PASSWORD_HASH")]
    password_hash: String,

    /// Company profile JSON file
    #[arg(short, long, env = "COMPANY_PROFILE")]
    company: Option<String>,

    /// TLS certificate (PEM)
    #[arg(long, requires = "tls_key")]
    tls_cert: Option<String>,

    /// TLS private key (PEM)
    #[arg(long, requires = "tls_cert")]
    tls_key: Option<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    match Cli::parse().command {
        Command::Invoice(args) => generate(DocumentKind::INVOICE, args),
        Command::Offer(args) => generate(DocumentKind::OFFER, args),
        Command::Serve(args) => serve(args),
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

fn generate(kind: DocumentKind, args: DocumentArgs) -> Result<(), AppError> {
    let mut profile = load_company_profile(&args.company)?;
    for (field, value) in &args.company_fields {
        profile.set(*field, value.as_str());
    }
    let mut doc = load_document(&args.input)?;
    apply_overrides(&mut doc, &args);

    if args.stdout {
        let bytes = pdf_bytes(&doc, &profile, &kind, LogoAccess::Any)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
        return Ok(());
    }

    let output_file = args
        .output
        .clone()
        .unwrap_or_else(|| kind.file_name.to_string());

    save_pdf(&doc, &profile, &kind, LogoAccess::Any, &output_file)?;
    info!("Wrote {}", output_file);

    println!("✓ Generated: {}", output_file);
    if !doc.number.is_empty() {
        println!("  {}: {}", kind.number_label, doc.number);
    }
    println!("  Date: {}", doc.date);
    println!("  Total: €{}", format_amount(grand_total(&doc.items)));

    Ok(())
}

fn serve(args: ServeArgs) -> Result<(), AppError> {
    let profile = load_company_profile(&args.company)?;
    let account = Account::new(args.username, args.password_hash)?;
    info!("Login enabled for '{}'", account.username);

    let state = Arc::new(AppState { account, profile });
    let tls = args.tls_cert.zip(args.tls_key);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(state, args.bind, tls))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn apply_overrides(doc: &mut Document, args: &DocumentArgs) {
    if let Some(ref logo) = args.logo {
        doc.logo = Some(logo.clone());
    }
    if let Some(ref number) = args.number {
        doc.number = number.clone();
    }
    if let Some(ref project) = args.project {
        doc.project = project.clone();
    }
    if let Some(ref date) = args.date {
        doc.date = date.clone();
    }
    if let Some(salutation) = args.salutation {
        doc.set_salutation(salutation.into());
    }
    if let Some(ref name) = args.recipient {
        doc.recipient.name = name.clone();
    }
    if let Some(ref address) = args.address {
        doc.recipient.address = address.replace("\\n", "\n");
    }
    for line in &args.lines {
        add_line(doc, line);
    }
    for (position, line) in &args.insert_lines {
        insert_line(doc, *position, line);
    }
    for position in &args.remove_lines {
        if doc.remove(*position).is_none() {
            warn!("No line at position {}, nothing removed", position);
        }
    }
}

fn parse_company_field(arg: &str) -> Result<(ProfileField, String), AppError> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| AppError::ConfigError(format!("Expected FIELD=VALUE, got '{}'", arg)))?;
    Ok((field.trim().parse()?, value.replace("\\n", "\n")))
}

fn parse_positioned_line(arg: &str) -> Result<(usize, String), AppError> {
    let (position, line) = arg
        .split_once(':')
        .ok_or_else(|| AppError::DocumentError(format!("Expected POS:LINE, got '{}'", arg)))?;
    let position = position
        .trim()
        .parse()
        .map_err(|e| AppError::DocumentError(format!("Invalid position '{}': {}", position, e)))?;
    Ok((position, line.to_string()))
}

/// "#Bad" adds a category, "Fliesen verlegen;10;25" an item.
fn add_line(doc: &mut Document, spec: &str) {
    if let Some(category) = spec.strip_prefix('#') {
        doc.push_category(category.trim());
        return;
    }

    let mut parts = spec.splitn(3, ';');
    let index = doc.push_item();
    doc.set_description(index, parts.next().unwrap_or_default().trim());
    if let Some(quantity) = parts.next() {
        doc.set_quantity(index, quantity.trim());
    }
    if let Some(price) = parts.next() {
        doc.set_price(index, price.trim());
    }
}

/// Like [`add_line`], but at `position` (clamped to the end of the list).
fn insert_line(doc: &mut Document, position: usize, spec: &str) {
    add_line(doc, spec);
    if let Some(item) = doc.remove(doc.items.len() - 1) {
        doc.insert(position, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoice_offer_pdf::LineItem;

    #[test]
    fn test_add_line() {
        let mut doc = Document::default();
        add_line(&mut doc, "#Bad");
        add_line(&mut doc, "Fliesen verlegen; 10 ;25");
        add_line(&mut doc, "Anfahrt");

        assert_eq!(
            doc.items,
            vec![
                LineItem::category("Bad"),
                LineItem::item("Fliesen verlegen", "10", "25"),
                LineItem::item("Anfahrt", "1", "0"),
            ]
        );
    }

    #[test]
    fn test_insert_and_remove_lines() {
        let cli = Cli::parse_from([
            "invoice-offer-pdf",
            "invoice",
            "--line",
            "Fliesen;10;25",
            "--line",
            "Fugen;2;7.5",
            "--insert-line",
            "0:#Bad",
            "--insert-line",
            "99:Anfahrt;1;40",
            "--remove-line",
            "2",
        ]);
        let Command::Invoice(args) = cli.command else {
            panic!("expected invoice subcommand");
        };
        let mut doc = Document::default();
        apply_overrides(&mut doc, &args);

        assert_eq!(
            doc.items,
            vec![
                LineItem::category("Bad"),
                LineItem::item("Fliesen", "10", "25"),
                LineItem::item("Anfahrt", "1", "40"),
            ]
        );
    }

    #[test]
    fn test_company_field_flags() {
        let cli = Cli::parse_from([
            "invoice-offer-pdf",
            "offer",
            "--company-field",
            "taxNumber=123/456",
            "--company-field",
            "address=Hauptstr. 1\\n84100 Niederaichbach",
        ]);
        let Command::Offer(args) = cli.command else {
            panic!("expected offer subcommand");
        };
        assert_eq!(
            args.company_fields,
            vec![
                (ProfileField::TaxNumber, "123/456".to_string()),
                (ProfileField::Address, "Hauptstr. 1\n84100 Niederaichbach".to_string()),
            ]
        );

        assert!(Cli::try_parse_from(["invoice-offer-pdf", "offer", "--company-field", "fax=1"]).is_err());
        assert!(Cli::try_parse_from(["invoice-offer-pdf", "offer", "--insert-line", "x:Fliesen"]).is_err());
    }

    #[test]
    fn test_cli_parses_lines_in_order() {
        let cli = Cli::parse_from([
            "invoice-offer-pdf",
            "offer",
            "--line",
            "#Bad",
            "--line",
            "Fliesen;2;3",
            "--salutation",
            "frau",
        ]);
        let Command::Offer(args) = cli.command else {
            panic!("expected offer subcommand");
        };
        assert_eq!(args.lines, vec!["#Bad", "Fliesen;2;3"]);
        assert!(matches!(args.salutation, Some(SalutationArg::Frau)));
    }
}
