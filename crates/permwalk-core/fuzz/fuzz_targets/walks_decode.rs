#![no_main]
use ciborium::de::from_reader;
use libfuzzer_sys::fuzz_target;
use permwalk_core::Walks;

fuzz_target!(|data: &[u8]| {
    if let Ok(walks) = from_reader::<Walks, _>(data) {
        let [n, l, s] = walks.shape();
        assert_eq!(walks.states_flat().len(), n * l * s);
        assert_eq!(walks.distances_flat().len(), n * l);
    }
});
