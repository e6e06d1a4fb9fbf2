mod gate;
mod routes;
mod state;
pub mod v1;

pub use gate::ExtractionGate;
pub use routes::create_router;
pub use state::AppState;
