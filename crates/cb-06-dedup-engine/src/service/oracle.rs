use cb_01_membership_filter::MembershipApi;
use cb_02_encounter_table::NoveltyOracle;
use shared_types::DeviceAddress;

/// Lets the encounter table consult a membership filter.
pub struct FilterOracle<'a, M: MembershipApi + ?Sized>(pub &'a mut M);

impl<M: MembershipApi + ?Sized> NoveltyOracle for FilterOracle<'_, M> {
    fn first_sighting(&mut self, address: &DeviceAddress) -> bool {
        self.0.contains_or_add(address)
    }
}
