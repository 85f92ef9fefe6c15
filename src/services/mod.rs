pub mod colorize_service;

pub use colorize_service::{
    BatchItem, BatchSummary, ColorizeService, FileReport, ItemStatus, Job, JobKind,
};
