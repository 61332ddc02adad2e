mod tenant;

pub use tenant::{AuthenticatedUser, TenantGateError, tenant_gate_middleware};
