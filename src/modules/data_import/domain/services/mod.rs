pub mod reload_policy;
pub mod report_renderer;

pub use reload_policy::ReloadPolicy;
pub use report_renderer::{
    BannerStyle, CappedList, ConflictRow, CoreCounters, ImportReport, ProgressView,
    ValidationReport,
};
