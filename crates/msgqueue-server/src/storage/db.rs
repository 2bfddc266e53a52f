//! SQLite database handle for the msgqueue server.

msgqueue_core::define_database!(QueueDatabase, "Queue database migrations complete");
