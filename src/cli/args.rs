use crate::scanner::DEFAULT_CAPTURE_WINDOW_MS;
use crate::types::{MovementType, ProductDraft};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Track product stock through an append-only movement ledger
#[derive(Parser, Debug)]
#[command(name = "inventory-ledger")]
#[command(about = "Track product stock through an append-only movement ledger", long_about = None)]
pub struct CliArgs {
    /// Directory holding products.json, movements.json and settings.json
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "inventory-data",
        help = "Directory where the inventory collections are stored"
    )]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommand),

    /// Record a stock movement for the product matching CODE
    Move {
        #[arg(value_enum, value_name = "TYPE")]
        movement_type: MovementArg,

        /// Scan code or product id
        #[arg(value_name = "CODE")]
        code: String,

        /// Whole number of units
        #[arg(value_name = "QUANTITY", allow_hyphen_values = true)]
        quantity: String,
    },

    /// Capture a code from the scanner (stdin), optionally recording a movement
    Scan {
        #[arg(long = "timeout-ms", value_name = "MS", default_value_t = DEFAULT_CAPTURE_WINDOW_MS)]
        timeout_ms: u64,

        /// Code used when the scanner is unavailable or times out
        #[arg(long = "fallback-code", value_name = "CODE")]
        fallback_code: Option<String>,

        /// Record an entrada of this many units for the scanned product
        #[arg(long, value_name = "QUANTITY", conflicts_with = "saida", allow_hyphen_values = true)]
        entrada: Option<String>,

        /// Record a saida of this many units for the scanned product
        #[arg(long, value_name = "QUANTITY", allow_hyphen_values = true)]
        saida: Option<String>,
    },

    /// List products matching TERM in name, id, brand, category or code
    Search {
        #[arg(value_name = "TERM")]
        term: Option<String>,
    },

    /// Apply movements from a CSV file with columns type,code,quantity
    Import {
        #[arg(value_name = "CSV")]
        file: PathBuf,
    },

    /// Print the stock report as CSV
    Report,

    /// Print the movement ledger as CSV, newest first
    Movements,

    /// Print dashboard figures
    Stats,

    /// Show or change settings
    Settings {
        #[arg(long, value_name = "NAME")]
        company: Option<String>,

        #[arg(long, value_name = "NAME")]
        user: Option<String>,

        #[arg(long = "low-stock-alert", value_name = "BOOL")]
        low_stock_alert: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Create a product
    Add(ProductFields),

    /// Replace every editable field of a product
    Edit {
        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product (its movements are kept)
    Delete {
        #[arg(value_name = "ID")]
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// List every product
    List,
}

/// Editable product fields
///
/// Text fields default to empty so that every invalid field is reported in
/// one pass by the catalog validation.
#[derive(Args, Debug, Clone)]
pub struct ProductFields {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub brand: String,

    #[arg(long, default_value = "")]
    pub category: String,

    /// Manufacturer or internal code
    #[arg(long, default_value = "")]
    pub code: String,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub stock: i64,

    #[arg(long = "min-stock", default_value_t = 1, allow_negative_numbers = true)]
    pub min_stock: i64,
}

impl ProductFields {
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            code: self.code.clone(),
            stock: self.stock,
            min_stock: self.min_stock,
        }
    }
}

/// Movement type as typed on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MovementArg {
    Entrada,
    Saida,
}

impl From<MovementArg> for MovementType {
    fn from(arg: MovementArg) -> Self {
        match arg {
            MovementArg::Entrada => MovementType::Entrada,
            MovementArg::Saida => MovementType::Saida,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_dir(&["program", "report"], "inventory-data")]
    #[case::explicit_dir(&["program", "--data-dir", "/tmp/inv", "report"], "/tmp/inv")]
    fn test_data_dir(#[case] args: &[&str], #[case] expected: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from(expected));
    }

    #[rstest]
    #[case::default_window(&["program", "scan"], DEFAULT_CAPTURE_WINDOW_MS)]
    #[case::explicit_window(&["program", "scan", "--timeout-ms", "250"], 250)]
    fn test_scan_timeout(#[case] args: &[&str], #[case] expected: u64) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        match parsed.command {
            Command::Scan { timeout_ms, .. } => assert_eq!(timeout_ms, expected),
            other => panic!("Expected scan, got {:?}", other),
        }
    }

    #[rstest]
    #[case::entrada(&["program", "move", "entrada", "P000001", "5"], MovementArg::Entrada, "5")]
    #[case::saida(&["program", "move", "saida", "PROD_P000001_MOUSE", "2"], MovementArg::Saida, "2")]
    #[case::negative_reaches_validation(&["program", "move", "saida", "P000001", "-2"], MovementArg::Saida, "-2")]
    fn test_move_parsing(#[case] args: &[&str], #[case] expected_type: MovementArg, #[case] expected_qty: &str) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        match parsed.command {
            Command::Move {
                movement_type,
                quantity,
                ..
            } => {
                assert_eq!(movement_type, expected_type);
                assert_eq!(quantity, expected_qty);
            }
            other => panic!("Expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_product_add_fields() {
        let parsed = CliArgs::try_parse_from([
            "program", "product", "add", "--name", "Mouse", "--category", "Perifericos", "--code",
            "MS-01", "--stock", "15", "--min-stock", "5",
        ])
        .unwrap();

        let Command::Product(ProductCommand::Add(fields)) = parsed.command else {
            panic!("Expected product add");
        };
        let draft = fields.to_draft();
        assert_eq!(draft.name, "Mouse");
        assert_eq!(draft.brand, "");
        assert_eq!((draft.stock, draft.min_stock), (15, 5));
    }

    #[test]
    fn test_product_defaults_leave_validation_to_catalog() {
        let parsed = CliArgs::try_parse_from(["program", "product", "add", "--stock", "-1"]).unwrap();

        let Command::Product(ProductCommand::Add(fields)) = parsed.command else {
            panic!("Expected product add");
        };
        assert_eq!(fields.name, "");
        assert_eq!(fields.stock, -1);
        assert_eq!(fields.min_stock, 1);
    }

    #[test]
    fn test_settings_options() {
        let parsed =
            CliArgs::try_parse_from(["program", "settings", "--user", "Joana", "--low-stock-alert", "false"])
                .unwrap();

        match parsed.command {
            Command::Settings {
                company,
                user,
                low_stock_alert,
            } => {
                assert_eq!(company, None);
                assert_eq!(user.as_deref(), Some("Joana"));
                assert_eq!(low_stock_alert, Some(false));
            }
            other => panic!("Expected settings, got {:?}", other),
        }
    }

    #[rstest]
    #[case::missing_command(&["program"])]
    #[case::unknown_movement_type(&["program", "move", "transfer", "P000001", "1"])]
    #[case::missing_quantity(&["program", "move", "entrada", "P000001"])]
    #[case::both_scan_types(&["program", "scan", "--entrada", "1", "--saida", "1"])]
    #[case::bad_timeout(&["program", "scan", "--timeout-ms", "soon"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
