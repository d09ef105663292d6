pub mod form_lock_handler_repo;

pub use form_lock_handler_repo::FormLockHandlerRepo;
