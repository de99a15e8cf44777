pub mod body;
pub mod builders;
pub mod redirect_policy;
pub mod services;
