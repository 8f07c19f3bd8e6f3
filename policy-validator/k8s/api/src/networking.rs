pub mod service_entry;
pub mod virtual_service;

pub use self::{
    service_entry::{Location, Resolution, ServiceEntry, ServiceEntrySpec, ServicePort},
    virtual_service::{VirtualService, VirtualServiceSpec},
};

pub const GROUP: &str = "networking.istio.io";
