//! Raw SQL operations. Every function takes a `&Connection` and is routed
//! through the pool by `SqliteRegressionStore`.

pub mod regressions;
