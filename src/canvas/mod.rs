pub mod actuation;
pub mod coords;
pub mod input;
pub mod messages;
pub mod model;
pub mod overlay;
pub mod surface;
pub mod view;

pub use messages::CanvasCommand;
pub use surface::Surface;
pub use view::CanvasView;
