//! Draw batching plan of a mesh.
//!
//! Built once after the material passes are compiled: one `DrawList` per
//! distinct pipeline state, listing the passes that own at least one part
//! with that state. Lists are split into an opaque and a transparent group
//! by the state's blend flag, and both groups keep first-seen order.

use rustc_hash::FxHashSet;
use crate::resource::{MeshPart, PipelineStateId};

/// Which half of a mesh's draw lists to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawGroup {
    /// Blend disabled, drawn first
    Opaque,
    /// Blend enabled, drawn after every opaque list
    Transparent,
}

impl DrawGroup {
    pub fn of(state: &PipelineStateId) -> Self {
        if state.is_transparent() {
            DrawGroup::Transparent
        } else {
            DrawGroup::Opaque
        }
    }
}

/// Passes sharing one pipeline state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawList {
    pub pipeline_state: PipelineStateId,
    /// Indices into the mesh's material passes, ascending
    pub material_passes: Vec<usize>,
}

/// Opaque and transparent draw lists of one mesh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawLists {
    pub opaque: Vec<DrawList>,
    pub transparent: Vec<DrawList>,
}

impl DrawLists {
    pub fn group(&self, group: DrawGroup) -> &[DrawList] {
        match group {
            DrawGroup::Opaque => &self.opaque,
            DrawGroup::Transparent => &self.transparent,
        }
    }

    /// Every list, opaque first
    pub fn iter(&self) -> impl Iterator<Item = &DrawList> {
        self.opaque.iter().chain(self.transparent.iter())
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }
}

pub struct DrawBatchPlanner;

impl DrawBatchPlanner {
    /// Distinct pipeline states over all parts of all passes, first-seen order
    pub fn distinct_states<'a, I>(passes: I) -> Vec<PipelineStateId>
    where
        I: IntoIterator<Item = &'a [MeshPart]>,
    {
        let mut seen = FxHashSet::default();
        let mut states = Vec::new();
        for parts in passes {
            for part in parts {
                if seen.insert(part.pipeline_state) {
                    states.push(part.pipeline_state);
                }
            }
        }
        states
    }

    /// Build the draw lists of a mesh from the parts of each of its passes
    ///
    /// A pass whose parts use several states appears in several lists.
    pub fn plan<'a, I>(passes: I) -> DrawLists
    where
        I: IntoIterator<Item = &'a [MeshPart]>,
    {
        let passes: Vec<&[MeshPart]> = passes.into_iter().collect();
        let mut lists = DrawLists::default();

        for state in Self::distinct_states(passes.iter().copied()) {
            let material_passes = passes
                .iter()
                .enumerate()
                .filter(|(_, parts)| parts.iter().any(|part| part.pipeline_state == state))
                .map(|(index, _)| index)
                .collect();

            let list = DrawList { pipeline_state: state, material_passes };
            match DrawGroup::of(&state) {
                DrawGroup::Opaque => lists.opaque.push(list),
                DrawGroup::Transparent => lists.transparent.push(list),
            }
        }

        lists
    }
}

#[cfg(test)]
#[path = "draw_list_tests.rs"]
mod tests;
