pub mod descriptor;
pub mod extend;
pub mod hooks;
pub mod overload;
pub mod registry;
pub mod resolve;
pub mod structural;
