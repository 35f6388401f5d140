pub(crate) mod process_installation_event;
pub(crate) mod provision_deployable_components;

pub use process_installation_event::{
    ProcessInstallationEventInterface, ProcessInstallationRepositoriesEventInterface,
};
pub use provision_deployable_components::ProvisionDeployableComponentsInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    process_installation_event::{
        MockProcessInstallationEventInterface, MockProcessInstallationRepositoriesEventInterface,
    },
    provision_deployable_components::MockProvisionDeployableComponentsInterface,
};
