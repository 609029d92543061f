//! Per-character font and tracking rewrite of a single text node.

use retrack_fonts::{FontCache, FontDescriptor, FontLoader, classify, is_korean, tracking_for};

use crate::error::RestyleError;
use crate::run::RunContext;
use crate::scene::{CharRange, Document, LetterSpacing};

/// Target style for one character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterPlan {
    pub font: FontDescriptor,
    /// Letter-spacing delta in pixels, when one applies
    pub tracking: Option<f64>,
}

/// Decide the target font and tracking for a character.
///
/// Korean text never gets tracking; other text gets the table value for the
/// rounded size when `apply_tracking` is set.
pub fn plan_character(c: char, weight: f64, size: f64, apply_tracking: bool) -> CharacterPlan {
    let korean = is_korean(c);
    let tracking = if apply_tracking && !korean {
        tracking_for(size.round())
    } else {
        None
    };
    CharacterPlan {
        font: classify(weight, korean),
        tracking,
    }
}

pub struct Rewriter<'r, 'l, L: FontLoader> {
    cache: &'r FontCache<'l, L>,
    apply_tracking: bool,
}

impl<'r, 'l, L: FontLoader> Rewriter<'r, 'l, L> {
    pub fn new(cache: &'r FontCache<'l, L>, apply_tracking: bool) -> Self {
        Self {
            cache,
            apply_tracking,
        }
    }

    /// Re-style every character of `node`, one character at a time.
    ///
    /// A font load or host failure aborts the node; characters already
    /// rewritten keep their new style.
    pub async fn rewrite<D: Document>(
        &self,
        doc: &mut D,
        node: D::NodeId,
        ctx: &mut RunContext,
    ) -> Result<(), RestyleError> {
        ctx.counters.total_layers += 1;

        let characters: Vec<char> = doc.characters(node).chars().collect();
        for (index, &c) in characters.iter().enumerate() {
            let range = CharRange::single(index);

            let weight = doc
                .font_weight(node, range)
                .uniform()
                .ok_or_else(|| mixed(node, "font weight", index))?;
            let size = doc
                .font_size(node, range)
                .uniform()
                .ok_or_else(|| mixed(node, "font size", index))?;

            let plan = plan_character(c, weight, size, self.apply_tracking);

            self.cache.ensure_loaded(&plan.font).await?;
            doc.set_font_name(node, range, &plan.font).await?;
            ctx.counters.changed_characters += 1;

            if let Some(delta) = plan.tracking {
                doc.set_letter_spacing(node, range, LetterSpacing::pixels(delta))
                    .await?;
            }

            ctx.reporter.report(
                ctx.counters.changed_characters,
                ctx.counters.total_characters,
            );
        }

        ctx.counters.processed_layers += 1;
        Ok(())
    }
}

fn mixed<N: std::fmt::Debug>(node: N, attribute: &'static str, index: usize) -> RestyleError {
    RestyleError::MixedRange {
        node: format!("{node:?}"),
        attribute,
        index,
    }
}
