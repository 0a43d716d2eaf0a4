mod campaigns;
mod load;
mod network;
mod walk;

pub use campaigns::{CampaignCatalog, CampaignLabel, GlobalCampaign, LocalCampaign};
pub use load::{PayloadPaths, PayloadSet, load_payloads};
pub use network::NetworkPayload;
