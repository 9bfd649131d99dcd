use super::{
    DeviceConfigOperation, DeviceConfigSpec, EthernetCardBacking, MacType, SharesInfo, SharesLevel,
    VirtualDevice, VirtualEthernetCard,
};
use crate::declaration::NetworkInterfaceDeclaration;

// Error Handling
use log::trace;

/*
* Pair the source network adapters with the declared interfaces by position.
*
* The nth adapter of the device list goes with the nth declaration.
* Extra adapters or extra declarations are left out.
*/
pub fn pair_network_interfaces(
    cards: Vec<VirtualEthernetCard>,
    declared: &[NetworkInterfaceDeclaration],
) -> impl Iterator<Item = (VirtualEthernetCard, &NetworkInterfaceDeclaration)> {
    cards.into_iter().zip(declared.iter())
}

/// Rewrite a source adapter with its declaration into an edit device change.
pub fn rewrite_ethernet_card(
    mut card: VirtualEthernetCard,
    declared: &NetworkInterfaceDeclaration,
    backing: EthernetCardBacking,
) -> DeviceConfigSpec {
    card.backing = Some(backing);

    let mut allocation = card.resource_allocation.take().unwrap_or_default();
    allocation.limit = Some(declared.bandwidth_limit);
    allocation.reservation = Some(declared.bandwidth_reservation);
    allocation.share = match declared.bandwidth_share_level {
        SharesLevel::Custom => SharesInfo {
            level: SharesLevel::Custom,
            shares: declared.bandwidth_share_count,
        },
        level => SharesInfo {
            level,
            shares: allocation.share.shares,
        },
    };
    card.resource_allocation = Some(allocation);

    // A dynamic address is a reset: nothing of the source address is kept.
    if declared.use_static_mac {
        card.address_type = Some(MacType::Manual);
        card.mac_address = Some(declared.mac_address.to_owned());
    } else {
        card.address_type = None;
        card.mac_address = None;
    }
    trace!("rewrote ethernet card {}: {:#?}", card.key, card);

    DeviceConfigSpec {
        operation: DeviceConfigOperation::Edit,
        device: VirtualDevice::EthernetCard(card),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::fixtures;
    use crate::inventory::ManagedObjectReference;
    use pretty_assertions::assert_eq;
    use vsclone_error::ObjectKind;

    fn declaration(network_id: &str) -> NetworkInterfaceDeclaration {
        NetworkInterfaceDeclaration {
            network_id: network_id.to_owned(),
            bandwidth_limit: -1,
            bandwidth_reservation: 0,
            bandwidth_share_level: SharesLevel::Normal,
            bandwidth_share_count: 0,
            use_static_mac: false,
            mac_address: "".to_owned(),
        }
    }
    fn card(key: i32, mac: Option<&str>) -> VirtualEthernetCard {
        match fixtures::ethernet_card(key, mac) {
            VirtualDevice::EthernetCard(e) => e,
            _ => unreachable!(),
        }
    }
    fn backing() -> EthernetCardBacking {
        EthernetCardBacking::Network {
            device_name: "prod".to_owned(),
            network: ManagedObjectReference::new(ObjectKind::Network, "network-12"),
        }
    }

    #[test]
    fn pair_up_to_the_shortest_side() {
        let cards = vec![card(4000, None), card(4001, None), card(4002, None)];
        let declared = vec![declaration("network-12")];
        let pairs: Vec<i32> = pair_network_interfaces(cards, &declared)
            .map(|(card, _)| card.key)
            .collect();
        assert_eq!(pairs, vec![4000]);

        let cards = vec![card(4000, None)];
        let declared = vec![declaration("network-12"), declaration("network-13")];
        let pairs: Vec<String> = pair_network_interfaces(cards, &declared)
            .map(|(_, nic)| nic.network_id.to_owned())
            .collect();
        assert_eq!(pairs, vec!["network-12".to_owned()]);
    }

    #[test]
    fn dynamic_mac_clears_source_address() {
        let source = card(4000, Some("00:50:56:aa:bb:cc"));
        let change = rewrite_ethernet_card(source, &declaration("network-12"), backing());
        assert_eq!(change.operation, DeviceConfigOperation::Edit);
        let VirtualDevice::EthernetCard(card) = change.device else {
            panic!("expected an ethernet card");
        };
        assert_eq!(card.address_type, None);
        assert_eq!(card.mac_address, None);
        assert_eq!(card.backing, Some(backing()));
    }

    #[test]
    fn static_mac_is_set_manually() {
        let mut nic = declaration("network-12");
        nic.use_static_mac = true;
        nic.mac_address = "00:50:56:01:02:03".to_owned();
        let change = rewrite_ethernet_card(card(4000, None), &nic, backing());
        let VirtualDevice::EthernetCard(card) = change.device else {
            panic!("expected an ethernet card");
        };
        assert_eq!(card.address_type, Some(MacType::Manual));
        assert_eq!(card.mac_address.as_deref(), Some("00:50:56:01:02:03"));
    }

    #[test]
    fn share_count_only_with_custom_level() {
        let mut nic = declaration("network-12");
        nic.bandwidth_limit = 1000;
        nic.bandwidth_reservation = 100;
        nic.bandwidth_share_level = SharesLevel::High;
        nic.bandwidth_share_count = 80;
        let change = rewrite_ethernet_card(card(4000, None), &nic, backing());
        let VirtualDevice::EthernetCard(rewritten) = change.device else {
            panic!("expected an ethernet card");
        };
        let allocation = rewritten.resource_allocation.unwrap();
        assert_eq!(allocation.limit, Some(1000));
        assert_eq!(allocation.reservation, Some(100));
        assert_eq!(allocation.share.level, SharesLevel::High);
        assert_eq!(allocation.share.shares, 0);

        nic.bandwidth_share_level = SharesLevel::Custom;
        let change = rewrite_ethernet_card(card(4000, None), &nic, backing());
        let VirtualDevice::EthernetCard(rewritten) = change.device else {
            panic!("expected an ethernet card");
        };
        let allocation = rewritten.resource_allocation.unwrap();
        assert_eq!(allocation.share.level, SharesLevel::Custom);
        assert_eq!(allocation.share.shares, 80);
    }
}
