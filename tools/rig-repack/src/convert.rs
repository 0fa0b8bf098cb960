//! Conversion operations: extract, compact, merge
//!
//! Each operation is one load -> (mutate) -> save pass over root containers.
//! Clips and bindings move between containers as shared references; nothing is
//! deep-copied.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rig_common::{Encoding, LayoutRules, load_container, save_container};

/// Pointer width written into merged output, independent of the host.
const MERGED_POINTER_WIDTH: u8 = 8;

/// Re-encode a binary skeleton container into editable tagged text.
///
/// The graph is written unmodified. The animation container must be present
/// even though nothing mutates it.
pub fn extract_to_text(input: &Path, output: &Path) -> Result<()> {
    let root = load_container(input)
        .with_context(|| format!("Failed to load container: {:?}", input))?;
    let container = root
        .animation_container()
        .with_context(|| format!("No animation data in {:?}", input))?;

    if container.skeletons.is_empty() {
        tracing::warn!(
            "{:?} carries no skeletons; the text output will have no bind poses to edit",
            input
        );
    }

    save_container(&root, output, Encoding::Text)
        .with_context(|| format!("Failed to write text container: {:?}", output))?;

    tracing::info!(
        "Extracted {:?} -> {:?} ({} skeletons, {} animations)",
        input,
        output,
        container.skeletons.len(),
        container.animations.len()
    );
    Ok(())
}

/// Re-encode an edited text container into the compact tagged binary form,
/// stripping the skeleton collection.
///
/// The skeleton is already consumed once editing is done; the compact output
/// carries animation data only. Layout rules are left at defaults.
pub fn compact_from_text(input: &Path, output: &Path) -> Result<()> {
    let mut root = load_container(input)
        .with_context(|| format!("Failed to load container: {:?}", input))?;
    let container = root
        .animation_container_mut()
        .with_context(|| format!("No animation data in {:?}", input))?;

    let stripped = container.skeletons.len();
    container.skeletons.clear();

    save_container(&root, output, Encoding::Tagged)
        .with_context(|| format!("Failed to write tagged container: {:?}", output))?;

    tracing::info!(
        "Compacted {:?} -> {:?} (stripped {} skeletons)",
        input,
        output,
        stripped
    );
    Ok(())
}

/// Merge one clip from an animation container into a skeleton container and
/// write the layout-explicit packed form with 8-byte pointers.
///
/// The binding is always taken from position 0: bindings are associated with
/// clips positionally, and multi-binding sources are not correlated against
/// `clip_index`.
pub fn merge_clip(
    skeleton_in: &Path,
    animation_in: &Path,
    clip_index: usize,
    output: &Path,
) -> Result<()> {
    let mut skeleton_root = load_container(skeleton_in)
        .with_context(|| format!("Failed to load container: {:?}", skeleton_in))?;
    let animation_root = load_container(animation_in)
        .with_context(|| format!("Failed to load container: {:?}", animation_in))?;

    let source = animation_root
        .animation_container()
        .with_context(|| format!("No animation data in {:?}", animation_in))?;
    let Some(clip) = source.animations.get(clip_index) else {
        bail!(
            "Clip index {} out of range: {:?} has {} animations",
            clip_index,
            animation_in,
            source.animations.len()
        );
    };
    let Some(binding) = source.bindings.first() else {
        bail!("No bindings in {:?}", animation_in);
    };

    let target = skeleton_root
        .animation_container_mut()
        .with_context(|| format!("No animation data in {:?}", skeleton_in))?;
    target.animations.push(Arc::clone(clip));
    target.bindings.push(Arc::clone(binding));

    let layout = LayoutRules {
        bytes_in_pointer: MERGED_POINTER_WIDTH,
        ..LayoutRules::host()
    };
    save_container(&skeleton_root, output, Encoding::Packed(layout))
        .with_context(|| format!("Failed to write packed container: {:?}", output))?;

    tracing::info!(
        "Merged clip '{}' (#{}) from {:?} into {:?}",
        clip.name,
        clip_index,
        animation_in,
        output
    );
    Ok(())
}
