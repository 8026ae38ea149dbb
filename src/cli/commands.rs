//! Command execution
//!
//! Opens the data directory, loads the engine and dispatches one command.
//! Human-readable results and CSV reports go to `output`; diagnostics go
//! through `tracing`.

use crate::cli::args::{CliArgs, Command, ProductCommand};
use crate::core::{Clock, InventoryEngine, SystemClock};
use crate::io::{import_movements, write_movements_csv, write_stock_report_csv, MovementReader};
use crate::scanner::{self, CaptureDevice, ScanOutcome, SimulatedCapture, StdinCapture};
use crate::storage::{JsonFileStorage, Storage};
use crate::types::{MovementRequest, MovementType, Product, ScanError, Settings};
use std::io::Write;
use std::time::Duration;
use tracing::info;

/// Run the parsed command against the data directory
///
/// # Errors
///
/// Returns a message when the collections cannot be loaded, the command is
/// rejected, or output cannot be written.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), String> {
    let storage = JsonFileStorage::open(&args.data_dir).map_err(|e| e.to_string())?;
    let mut engine = InventoryEngine::load(storage, SystemClock).map_err(|e| e.to_string())?;
    execute(&mut engine, &args.command, output)
}

/// Dispatch one command on a loaded engine
pub fn execute<S: Storage, C: Clock>(
    engine: &mut InventoryEngine<S, C>,
    command: &Command,
    output: &mut dyn Write,
) -> Result<(), String> {
    match command {
        Command::Product(product_command) => execute_product(engine, product_command, output),
        Command::Move {
            movement_type,
            code,
            quantity,
        } => {
            let product_id = engine.resolve_code(code).map_err(|e| e.to_string())?.id.clone();
            let request = MovementRequest {
                product_id,
                movement_type: Some((*movement_type).into()),
                quantity: quantity.clone(),
            };
            engine.apply_movement(&request).map_err(|e| e.to_string())?;
            write_committed(engine, &request.product_id, output)
        }
        Command::Scan {
            timeout_ms,
            fallback_code,
            entrada,
            saida,
        } => {
            let fallback_code = fallback_code
                .clone()
                .or_else(|| engine.catalog().products().first().map(|p| p.qr_code.clone()));
            let mut fallback = match fallback_code {
                Some(code) => SimulatedCapture::with_code(code),
                None => SimulatedCapture::empty(),
            };
            let movement = match (entrada, saida) {
                (Some(quantity), _) => Some((MovementType::Entrada, quantity.as_str())),
                (None, Some(quantity)) => Some((MovementType::Saida, quantity.as_str())),
                (None, None) => None,
            };
            scan_with(
                engine,
                &mut StdinCapture::new(),
                &mut fallback,
                Duration::from_millis(*timeout_ms),
                movement,
                output,
            )
        }
        Command::Search { term } => {
            let matches = engine.search(term.as_deref().unwrap_or(""));
            for product in &matches {
                write_product_line(product, output)?;
            }
            writeln!(output, "{} product(s) found", matches.len()).map_err(write_error)
        }
        Command::Import { file } => {
            let reader = MovementReader::from_path(file)?;
            let summary = import_movements(engine, reader);
            writeln!(
                output,
                "Imported {} movement(s), rejected {}",
                summary.applied, summary.rejected
            )
            .map_err(write_error)
        }
        Command::Report => write_stock_report_csv(engine.catalog().products(), output),
        Command::Movements => write_movements_csv(engine.ledger().movements(), output),
        Command::Stats => {
            let stats = engine.stats();
            writeln!(output, "Company: {}", engine.settings().company_name).map_err(write_error)?;
            writeln!(output, "Products: {}", stats.total_products).map_err(write_error)?;
            writeln!(output, "Low stock: {}", stats.low_stock_products).map_err(write_error)?;
            writeln!(output, "Movements today: {}", stats.movements_today).map_err(write_error)?;
            writeln!(output, "Units in stock: {}", stats.total_units).map_err(write_error)
        }
        Command::Settings {
            company,
            user,
            low_stock_alert,
        } => {
            if company.is_some() || user.is_some() || low_stock_alert.is_some() {
                let current = engine.settings().clone();
                engine.update_settings(Settings {
                    company_name: company.clone().unwrap_or(current.company_name),
                    responsible_user: user.clone().unwrap_or(current.responsible_user),
                    low_stock_alert: low_stock_alert.unwrap_or(current.low_stock_alert),
                });
            }
            let settings = engine.settings();
            writeln!(output, "Company: {}", settings.company_name).map_err(write_error)?;
            writeln!(output, "Responsible user: {}", settings.responsible_user).map_err(write_error)?;
            writeln!(output, "Low stock alert: {}", settings.low_stock_alert).map_err(write_error)
        }
    }
}

fn execute_product<S: Storage, C: Clock>(
    engine: &mut InventoryEngine<S, C>,
    command: &ProductCommand,
    output: &mut dyn Write,
) -> Result<(), String> {
    match command {
        ProductCommand::Add(fields) => {
            let product = engine
                .create_product(&fields.to_draft())
                .map_err(|e| e.to_string())?;
            writeln!(output, "Created {} {} ({})", product.id, product.name, product.qr_code)
                .map_err(write_error)
        }
        ProductCommand::Edit { id, fields } => {
            let product = engine
                .update_product(id, &fields.to_draft())
                .map_err(|e| e.to_string())?;
            writeln!(output, "Updated {} {}", product.id, product.name).map_err(write_error)
        }
        ProductCommand::Delete { id, yes } => {
            if !yes {
                return Err(format!("Refusing to delete {} without --yes", id));
            }
            let product = engine.delete_product(id).map_err(|e| e.to_string())?;
            writeln!(output, "Deleted {} {}", product.id, product.name).map_err(write_error)
        }
        ProductCommand::List => {
            for product in engine.catalog().products() {
                write_product_line(product, output)?;
            }
            Ok(())
        }
    }
}

/// Capture a code, select its product and optionally submit a movement
pub fn scan_with<S, C, D, F>(
    engine: &mut InventoryEngine<S, C>,
    device: &mut D,
    fallback: &mut F,
    window: Duration,
    movement: Option<(MovementType, &str)>,
    output: &mut dyn Write,
) -> Result<(), String>
where
    S: Storage,
    C: Clock,
    D: CaptureDevice + ?Sized,
    F: CaptureDevice + ?Sized,
{
    let outcome = capture_blocking(device, fallback, window).map_err(|e| e.to_string())?;

    let product = engine.select_by_code(&outcome.code).map_err(|e| e.to_string())?;
    let source = if outcome.is_simulated() { " (simulated)" } else { "" };
    writeln!(
        output,
        "Scanned {}{} -> {} {}",
        outcome.code, source, product.id, product.name
    )
    .map_err(write_error)?;
    info!(code = %outcome.code, simulated = outcome.is_simulated(), "code scanned");

    let Some((movement_type, quantity)) = movement else {
        return Ok(());
    };
    engine.set_movement_type(movement_type);
    engine.set_quantity(quantity);
    let movement = engine.submit_draft().map_err(|e| e.to_string())?;
    write_committed(engine, &movement.product_id, output)
}

fn capture_blocking<D, F>(device: &mut D, fallback: &mut F, window: Duration) -> Result<ScanOutcome, ScanError>
where
    D: CaptureDevice + ?Sized,
    F: CaptureDevice + ?Sized,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ScanError::unavailable(e.to_string()))?;
    let outcome = runtime.block_on(scanner::capture_with_fallback(device, fallback, window));
    // Nothing left on the runtime may hold the process after the window.
    runtime.shutdown_background();
    outcome
}

fn write_committed<S: Storage, C: Clock>(
    engine: &InventoryEngine<S, C>,
    product_id: &str,
    output: &mut dyn Write,
) -> Result<(), String> {
    let Some(movement) = engine.ledger().latest() else {
        return Ok(());
    };
    let stock = engine
        .catalog()
        .get(product_id)
        .map(|p| p.stock)
        .unwrap_or_default();
    writeln!(
        output,
        "Recorded {} of {} for {} ({}): stock now {}",
        movement.movement_type, movement.quantity, movement.product, movement.product_id, stock
    )
    .map_err(write_error)
}

fn write_product_line(product: &Product, output: &mut dyn Write) -> Result<(), String> {
    let flag = if product.is_low_stock() { "  LOW" } else { "" };
    writeln!(
        output,
        "{}  {}  stock {}/{}  {}{}",
        product.id, product.name, product.stock, product.min_stock, product.qr_code, flag
    )
    .map_err(write_error)
}

fn write_error(e: std::io::Error) -> String {
    format!("Failed to write output: {}", e)
}
