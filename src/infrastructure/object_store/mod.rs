//! Document store implementations

mod supabase;

pub use supabase::{SupabaseDocumentStore, UnconfiguredDocumentStore};
