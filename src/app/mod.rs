// Application layer - Use case interactors

pub mod check_interactor;
pub mod container;
pub mod inspect_interactor;
pub mod process_interactor;

// Re-export interactors
pub use check_interactor::CheckInteractor;
pub use inspect_interactor::InspectInteractor;
pub use process_interactor::ProcessInteractor;
