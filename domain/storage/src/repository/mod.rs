mod ledger;

#[rustfmt::skip]
pub use {
    ledger::UploadLedger,
};
