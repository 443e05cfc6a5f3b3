pub mod canvas;
pub mod dispatch;
pub mod encode;
pub mod figure;
pub mod font;
pub mod generator;
pub mod style;
pub mod visuals;

pub use dispatch::{generate_visual_for_question, render_kind, select_visual, VisualKind};
pub use encode::{decode_data_uri, to_data_uri, write_png, DATA_URI_PREFIX};
pub use generator::VisualGenerator;
pub use style::{validate_render, Palette, RenderConfig};
pub use visuals::SequenceKind;
