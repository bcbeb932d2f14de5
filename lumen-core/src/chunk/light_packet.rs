//! Converting chunk light to and from light update packets.

use lumen_protocol::codec::BitSet;
use lumen_protocol::packets::{LIGHT_SECTION_BYTES, LightUpdatePacketData};

use crate::chunk::light_chunk::{LightChunk, SUB_CHUNK_COUNT};
use crate::chunk::light_storage::LightStorage;
use crate::error::LightDataError;
use crate::light_type::LightType;

impl LightChunk {
    /// Packs the arrays of the bands set in `block_bands` and `sky_bands`.
    ///
    /// Bands without light arrays are left out. Arrays that are entirely zero
    /// only set their bit in the matching empty mask.
    #[must_use]
    pub fn extract_light_data(&self, block_bands: u16, sky_bands: u16, has_sky: bool) -> LightUpdatePacketData {
        let mut data = LightUpdatePacketData {
            sky_y_mask: BitSet::with_bits(SUB_CHUNK_COUNT),
            block_y_mask: BitSet::with_bits(SUB_CHUNK_COUNT),
            empty_sky_y_mask: BitSet::with_bits(SUB_CHUNK_COUNT),
            empty_block_y_mask: BitSet::with_bits(SUB_CHUNK_COUNT),
            sky_updates: Vec::new(),
            block_updates: Vec::new(),
        };

        for (band, section) in self.sections() {
            if block_bands & (1 << band) != 0
                && let Some(storage) = section.storage(LightType::Block)
            {
                if storage.is_uniform(0) {
                    data.empty_block_y_mask.set(band, true);
                } else {
                    data.block_y_mask.set(band, true);
                    data.block_updates.push(storage.to_packet_data());
                }
            }

            if has_sky
                && sky_bands & (1 << band) != 0
                && let Some(storage) = section.storage(LightType::Sky)
            {
                if storage.is_uniform(0) {
                    data.empty_sky_y_mask.set(band, true);
                } else {
                    data.sky_y_mask.set(band, true);
                    data.sky_updates.push(storage.to_packet_data());
                }
            }
        }
        data
    }

    /// Packs every band that has light arrays.
    #[must_use]
    pub fn extract_full_light_data(&self, has_sky: bool) -> LightUpdatePacketData {
        self.extract_light_data(u16::MAX, u16::MAX, has_sky)
    }

    /// Packs the bands written since the last call and clears that record.
    pub fn extract_changed_light_data(&mut self, has_sky: bool) -> LightUpdatePacketData {
        let [block_bands, sky_bands] = self.take_changed_sections();
        self.extract_light_data(block_bands, sky_bands, has_sky)
    }

    /// Overwrites bands with the arrays of a received packet.
    ///
    /// Nothing is written unless every mask matches its array count and every
    /// array has the right length.
    pub fn apply_light_data(&mut self, data: &LightUpdatePacketData, has_sky: bool) -> Result<(), LightDataError> {
        let block = decode_arrays(
            "block_updates",
            &data.block_y_mask,
            &data.empty_block_y_mask,
            &data.block_updates,
        )?;
        let sky = if has_sky {
            decode_arrays("sky_updates", &data.sky_y_mask, &data.empty_sky_y_mask, &data.sky_updates)?
        } else {
            Vec::new()
        };

        for (light_type, arrays) in [(LightType::Block, block), (LightType::Sky, sky)] {
            for (band, storage) in arrays {
                self.ensure_section(band, has_sky).replace_storage(light_type, storage);
            }
        }
        Ok(())
    }
}

fn decode_arrays(
    field: &'static str,
    mask: &BitSet,
    empty_mask: &BitSet,
    arrays: &[Vec<u8>],
) -> Result<Vec<(usize, LightStorage)>, LightDataError> {
    let bands: Vec<usize> = (0..SUB_CHUNK_COUNT).filter(|band| mask.get(*band)).collect();
    if bands.len() != arrays.len() {
        return Err(LightDataError::InvalidLength {
            field,
            expected: bands.len(),
            found: arrays.len(),
        });
    }

    let mut decoded = Vec::with_capacity(SUB_CHUNK_COUNT);
    for (band, bytes) in bands.into_iter().zip(arrays) {
        let storage = LightStorage::from_bytes(bytes).ok_or(LightDataError::InvalidLength {
            field,
            expected: LIGHT_SECTION_BYTES,
            found: bytes.len(),
        })?;
        decoded.push((band, storage));
    }
    decoded.extend(
        (0..SUB_CHUNK_COUNT)
            .filter(|band| empty_mask.get(*band) && !mask.get(*band))
            .map(|band| (band, LightStorage::new_empty())),
    );
    Ok(decoded)
}
