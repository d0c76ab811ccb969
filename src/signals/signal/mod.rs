pub mod state_source;

pub trait Base: Send + Sync {
    fn type_name(&self) -> &'static str;
}
