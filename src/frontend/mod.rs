pub mod components;
pub mod sections;

pub use sections::{
    render_section, render_sections, RenderedSection, SectionContext,
};
