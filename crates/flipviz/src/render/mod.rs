//! Plotters-based renderers for the static figure and the animations.
pub mod animation;
pub mod figure;
pub mod panels;
pub mod pdf;

pub use animation::{render_animation, AnimationStyle, Frame, FrameSource, RenderedAnimation};
pub use figure::{render_static_figure, FigureLayout, PanelContent, PanelSpec, RenderedFigure};
pub use panels::{draw_density_panel, draw_divergence_panel, DensityStyle};
pub use pdf::{svg_to_pdf, write_pdf_from_svg};
