pub mod bundle;

pub use bundle::{
    export_all, export_bundle, to_json, CareBundle, ExportError, Finding, FindingSeverity,
    SubjectRecord,
};
