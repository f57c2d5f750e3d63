//! Repository implementations using SeaORM

pub mod ledger_repository;

pub use ledger_repository::SeaOrmLedgerQueries;
