mod load;
mod record;

pub use load::load_dataset;
pub use record::{Dataset, Record, Value};
