//! XML reading helpers and the owned element tree used for writing.

mod element;
mod utils;

pub use element::{render_document, Element};
pub use utils::{
    describe_element, element_children, find_child, find_children, get_tag_name, get_text,
    parse_document,
};
