pub mod http_client;
pub mod supabase;

pub use http_client::ReqwestHttp;
pub use supabase::SupabaseRest;
