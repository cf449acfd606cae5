mod cli;
mod commands;
mod history;
mod infra;
mod routes;
mod server;
mod views;

use loan_risk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
