// BloomBook state managers
// Managers hold client-side state and drive it from UI actions.

pub mod library_manager;
