use super::{InstantCloneSpec, OptionValue};
use crate::connection::Connection;
use crate::declaration::VmDeclaration;
use crate::device::{pair_network_interfaces, rewrite_ethernet_card};
use crate::inventory::ManagedObjectReference;

// Error Handling
use log::{debug, info, trace};
use vsclone_error::VscloneError;

impl VmDeclaration {
    /*
     * Build the instant clone request.
     *
     * The new virtual machine shares the memory and disk state
     * of a running source. Its network adapters are rewired
     * to the declared networks, by position.
     * Returns the request along with the source to clone from.
     */
    pub async fn expand_instant_clone_spec(
        &self,
        conn: &Connection,
        folder: &ManagedObjectReference,
    ) -> Result<(InstantCloneSpec, ManagedObjectReference), VscloneError> {
        let instant_clone = self.instant_clone_block()?;
        let mut spec = InstantCloneSpec {
            name: self.name.to_owned(),
            ..Default::default()
        };

        if let Some(id) = self.datastore_id.as_known() {
            spec.location.datastore = Some(conn.datastore(id).await?);
        }
        spec.location.folder = Some(folder.to_owned());
        spec.config = self
            .extra_config
            .iter()
            .map(|(key, value)| OptionValue {
                key: key.to_owned(),
                value: value.to_owned(),
            })
            .collect();

        let id = instant_clone
            .source_uuid
            .require("instant_clone.source_uuid")?;
        debug!("instant cloning from {}", id);
        let (vm, source) = conn.source(id).await?;

        let cards = source.devices().ethernet_cards();
        for (card, declared) in pair_network_interfaces(cards, &self.network_interface) {
            let network = conn.network(&declared.network_id).await?;
            let backing = conn.ethernet_card_backing(&network).await?;
            trace!("plugging ethernet card {} into {}", card.key, network);
            spec.location
                .device_change
                .push(rewrite_ethernet_card(card, declared, backing));
        }

        // No host placement: the clone stays on the host of its source.
        let pool_id = self.resource_pool_id.require("resource_pool_id")?;
        spec.location.pool = Some(conn.resource_pool(pool_id).await?);

        spec.location.disk = conn
            .reconciler
            .relocate_disks(conn, self, source.devices())
            .await?;

        info!("instant clone spec for {} ready", self.name);
        Ok((spec, vm))
    }
}
