use sea_orm_migration::prelude::*;

use starshield_verification_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
