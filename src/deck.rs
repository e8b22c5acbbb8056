//! Persisted slide/element data and per-element animation configuration.
//!
//! This is the data the editor saves. Playback never writes here; only the editing operations
//! below do, and they keep the click-order invariant: an element has a click order iff it is
//! click-gated, and click orders are unique within a slide.

use crate::animation::preset::{Direction, PresetOptions, PresetRegistry};
use crate::foundation::core::{ElementKind, OriginalState};
use crate::foundation::error::{MotionError, MotionResult};
use std::collections::{BTreeSet, HashSet};

fn enabled_default() -> bool {
    true
}

fn duration_default() -> f64 {
    0.5
}

/// Animation settings attached to one canvas element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAnimationConfig {
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Preset id.
    #[serde(rename = "type")]
    pub preset: String,
    #[serde(rename = "duration", default = "duration_default")]
    pub duration_secs: f64,
    #[serde(default)]
    pub appear_on_click: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_order: Option<u32>,
    #[serde(default)]
    pub direction: Direction,
}

impl ElementAnimationConfig {
    pub fn new(preset: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            enabled: true,
            preset: preset.into(),
            duration_secs,
            appear_on_click: false,
            click_order: None,
            direction: Direction::default(),
        }
    }

    /// Gate the element behind a click; the order is assigned when the config is applied.
    pub fn on_click(mut self) -> Self {
        self.appear_on_click = true;
        self
    }

    pub fn with_click_order(mut self, order: u32) -> Self {
        self.appear_on_click = true;
        self.click_order = Some(order);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn options(&self) -> PresetOptions {
        PresetOptions {
            direction: self.direction,
        }
    }
}

/// One canvas element as persisted by the editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<ElementAnimationConfig>,
}

impl ElementData {
    pub fn new(id: impl Into<String>, kind: ElementKind, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            x,
            y,
            scale_x: None,
            scale_y: None,
            opacity: None,
            rotation: None,
            text: None,
            animation: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_animation(mut self, config: ElementAnimationConfig) -> Self {
        self.animation = Some(config);
        self
    }

    /// Enabled animation config, if any.
    pub fn active_animation(&self) -> Option<&ElementAnimationConfig> {
        self.animation.as_ref().filter(|a| a.enabled)
    }

    /// Waits for a click during presentation. Disabled configs never gate.
    pub fn is_click_gated(&self) -> bool {
        self.active_animation().is_some_and(|a| a.appear_on_click)
    }

    /// Click order of a gated config, enabled or not.
    pub fn click_order(&self) -> Option<u32> {
        self.animation
            .as_ref()
            .filter(|a| a.appear_on_click)
            .and_then(|a| a.click_order)
    }
}

/// Resolve the element's persisted pose, filling absent fields with their defaults
/// (scale 1, opacity 1, rotation 0).
pub fn resolve_original_state(element: &ElementData) -> OriginalState {
    OriginalState {
        x: element.x,
        y: element.y,
        scale_x: element.scale_x.unwrap_or(1.0),
        scale_y: element.scale_y.unwrap_or(1.0),
        opacity: element.opacity.unwrap_or(1.0),
        rotation: element.rotation.unwrap_or(0.0),
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(default)]
    pub elements: Vec<ElementData>,
}

impl Slide {
    pub fn new(id: impl Into<String>, elements: Vec<ElementData>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }

    pub fn element(&self, id: &str) -> Option<&ElementData> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements configured to appear on click, in reveal order.
    ///
    /// Sorting is stable: equal click orders keep element order, and a missing order sorts last.
    pub fn click_sequence(&self) -> Vec<&ElementData> {
        let mut gated: Vec<&ElementData> = self
            .elements
            .iter()
            .filter(|e| e.animation.as_ref().is_some_and(|a| a.appear_on_click))
            .collect();
        gated.sort_by_key(|e| e.click_order().unwrap_or(u32::MAX));
        gated
    }

    pub fn max_click_order(&self) -> u32 {
        self.elements
            .iter()
            .filter_map(ElementData::click_order)
            .max()
            .unwrap_or(0)
    }

    fn renumber(&mut self, ordered_ids: &[String]) {
        for (i, id) in ordered_ids.iter().enumerate() {
            if let Some(config) = self
                .elements
                .iter_mut()
                .find(|e| &e.id == id)
                .and_then(|e| e.animation.as_mut())
            {
                config.click_order = Some(i as u32 + 1);
            }
        }
    }
}

/// Which neighbour to swap with in a click sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickStep {
    Earlier,
    Later,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            title: String::new(),
            slides,
        }
    }

    pub fn from_json(json: &str) -> MotionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> MotionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> MotionResult<&Slide> {
        self.slides.get(index).ok_or(MotionError::SlideOutOfRange {
            index,
            len: self.slides.len(),
        })
    }

    fn locate(&self, id: &str) -> MotionResult<(usize, usize)> {
        self.slides
            .iter()
            .enumerate()
            .find_map(|(si, slide)| {
                slide
                    .elements
                    .iter()
                    .position(|e| e.id == id)
                    .map(|ei| (si, ei))
            })
            .ok_or_else(|| MotionError::element_not_found(id))
    }

    pub fn element(&self, id: &str) -> Option<&ElementData> {
        let (si, ei) = self.locate(id).ok()?;
        Some(&self.slides[si].elements[ei])
    }

    /// Index of the slide holding `id`.
    pub fn slide_of(&self, id: &str) -> Option<usize> {
        self.locate(id).ok().map(|(si, _)| si)
    }

    pub fn animation_config(&self, id: &str) -> Option<&ElementAnimationConfig> {
        self.element(id)?.animation.as_ref()
    }

    pub fn original_state(&self, id: &str) -> MotionResult<OriginalState> {
        self.element(id)
            .map(resolve_original_state)
            .ok_or_else(|| MotionError::element_not_found(id))
    }

    /// Store `config` on the element. No playback happens.
    ///
    /// A click-gated config keeps an explicit or previously assigned order when it is positive
    /// and free on the slide; otherwise it gets `max + 1`. Configs that are not click-gated
    /// lose their order.
    #[tracing::instrument(skip(self, config), fields(preset = %config.preset))]
    pub fn apply_animation_config(
        &mut self,
        id: &str,
        config: ElementAnimationConfig,
    ) -> MotionResult<()> {
        let mut config = config;
        let (si, ei) = self.locate(id)?;
        let slide = &mut self.slides[si];

        if config.appear_on_click {
            let others = || {
                slide
                    .elements
                    .iter()
                    .enumerate()
                    .filter(move |(i, _)| *i != ei)
                    .filter_map(|(_, e)| e.click_order())
            };
            let previous = slide.elements[ei].click_order();
            let wanted = config.click_order.or(previous);
            config.click_order = match wanted {
                Some(n) if n > 0 && !others().any(|o| o == n) => Some(n),
                _ => Some(others().max().unwrap_or(0) + 1),
            };
        } else {
            config.click_order = None;
        }

        tracing::debug!(
            element = id,
            click_order = ?config.click_order,
            "animation config applied"
        );
        slide.elements[ei].animation = Some(config);
        Ok(())
    }

    /// Drop the element's animation and close the gap it leaves in the click sequence.
    pub fn remove_animation(&mut self, id: &str) -> MotionResult<Option<ElementAnimationConfig>> {
        let (si, ei) = self.locate(id)?;
        let slide = &mut self.slides[si];
        let removed = slide.elements[ei].animation.take();
        if removed.as_ref().is_some_and(|a| a.appear_on_click) {
            let order: Vec<String> = slide.click_sequence().iter().map(|e| e.id.clone()).collect();
            slide.renumber(&order);
        }
        Ok(removed)
    }

    /// Assign click orders `1..=n` following `ordered_ids`, which must list every click-gated
    /// element of the slide exactly once.
    pub fn reorder_click_sequence(
        &mut self,
        slide_index: usize,
        ordered_ids: &[&str],
    ) -> MotionResult<()> {
        let len = self.slides.len();
        let slide = self
            .slides
            .get_mut(slide_index)
            .ok_or(MotionError::SlideOutOfRange {
                index: slide_index,
                len,
            })?;

        let gated: BTreeSet<&str> = slide
            .click_sequence()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        let requested: BTreeSet<&str> = ordered_ids.iter().copied().collect();
        if requested.len() != ordered_ids.len() || requested != gated {
            return Err(MotionError::validation(format!(
                "click sequence for slide {slide_index} must list each click-gated element once"
            )));
        }

        let order: Vec<String> = ordered_ids.iter().map(|s| (*s).to_owned()).collect();
        slide.renumber(&order);
        Ok(())
    }

    /// Swap a click-gated element with its neighbour. Returns `false` at either end.
    pub fn move_click_order(&mut self, id: &str, step: ClickStep) -> MotionResult<bool> {
        let (si, _) = self.locate(id)?;
        let mut order: Vec<String> = self.slides[si]
            .click_sequence()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        let pos = order
            .iter()
            .position(|e| e == id)
            .ok_or_else(|| MotionError::validation(format!("element '{id}' is not click-gated")))?;
        let target = match step {
            ClickStep::Earlier => pos.checked_sub(1),
            ClickStep::Later => Some(pos + 1).filter(|&p| p < order.len()),
        };
        let Some(target) = target else {
            return Ok(false);
        };
        order.swap(pos, target);
        self.slides[si].renumber(&order);
        Ok(true)
    }

    /// Structural checks: unique element ids, known presets, and the click-order invariant.
    ///
    /// Playback tolerates decks that fail this; it is meant for editing tools.
    pub fn validate(&self, registry: &PresetRegistry) -> MotionResult<()> {
        let mut ids = HashSet::new();
        for (si, slide) in self.slides.iter().enumerate() {
            let mut orders = HashSet::new();
            for element in &slide.elements {
                if !ids.insert(element.id.as_str()) {
                    return Err(MotionError::validation(format!(
                        "duplicate element id '{}'",
                        element.id
                    )));
                }
                let Some(config) = &element.animation else {
                    continue;
                };
                let preset = registry.lookup(&config.preset)?;
                registry.ensure_applicable(preset, element.kind)?;
                match (config.appear_on_click, config.click_order) {
                    (true, Some(n)) if n > 0 => {
                        if !orders.insert(n) {
                            return Err(MotionError::validation(format!(
                                "slide {si}: click order {n} is used twice"
                            )));
                        }
                    }
                    (true, _) => {
                        return Err(MotionError::validation(format!(
                            "element '{}' appears on click without a positive click order",
                            element.id
                        )));
                    }
                    (false, Some(_)) => {
                        return Err(MotionError::validation(format!(
                            "element '{}' has a click order but does not appear on click",
                            element.id
                        )));
                    }
                    (false, None) => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/deck.rs"]
mod tests;
