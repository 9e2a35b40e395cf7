//! Medicare care record server - integration test support.
//!
//! Re-exports the workspace crates under one `medicare_test::` root so the
//! integration tests read like code inside the server.

pub mod component {
    pub use medicare_core::{config, constants, event, kind, patient, registry, types};

    pub mod service {
        pub use medicare_service::*;
    }

    pub mod db {
        pub use medicare_db::db::*;
        pub use medicare_db::error;

        pub mod connection {
            pub use medicare_app::db_handler::DbProviderHandler;
            pub use medicare_db::db::connection::*;
        }
    }

    pub mod model {
        pub use medicare_db::model::*;
    }
}

pub mod app {
    pub use medicare_app::*;

    pub mod api {
        pub use medicare_app::app::api::*;
    }
}
