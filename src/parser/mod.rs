pub mod hipermaxi_parser;

pub use hipermaxi_parser::{RawCategoryNode, RawProduct, RawSubcategoryNode};
