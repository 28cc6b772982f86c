//! Browser glue
//!
//! Web Animations backend for [`CardAnimator`](crate::animator::CardAnimator)
//! and helpers turning pointer/touch events into [`SwipeInput`]s.

use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, PointerEvent, TouchEvent};

use crate::animator::{AnimationBackend, AnimationId, CardTransform, Timing};
use crate::controller::{InputPhase, SwipeInput};
use crate::policy::DragFeedback;

/// Web Animations API backend bound to one card element
pub struct WebAnimationBackend {
    element: HtmlElement,
    running: Option<(AnimationId, web_sys::Animation)>,
    on_settled: Rc<dyn Fn(AnimationId)>,
    animations_supported: bool,
}

impl WebAnimationBackend {
    /// `on_settled` is called once for every transition that runs to completion.
    pub fn new(element: HtmlElement, on_settled: Rc<dyn Fn(AnimationId)>) -> Self {
        let animations_supported = supports_animate(&element);
        if !animations_supported {
            log::warn!("[SWIPE] Element.animate unavailable, transitions will be instant");
        }
        Self { element, running: None, on_settled, animations_supported }
    }

    fn set_style(&self, name: &str, value: &str) {
        let _ = self.element.style().set_property(name, value);
    }

    /// Transform the browser is rendering right now, mid-animation included
    fn rendered_transform(&self) -> Option<CardTransform> {
        let window = web_sys::window()?;
        let style = window.get_computed_style(&self.element).ok()??;
        let matrix = parse_css_matrix(&style.get_property_value("transform").ok()?)?;
        let opacity = style.get_property_value("opacity").ok()?.trim().parse::<f64>().unwrap_or(1.0);
        Some(matrix.to_transform(opacity))
    }
}

impl AnimationBackend for WebAnimationBackend {
    fn apply(&mut self, transform: &CardTransform) {
        self.set_style("transform", &transform.to_css());
        self.set_style("opacity", &transform.opacity.to_string());
        // Drop any finished animation still holding its last frame
        if let Some((_, animation)) = self.running.take() {
            animation.cancel();
        }
    }

    fn set_overlays(&mut self, feedback: &DragFeedback) {
        self.set_style("--like", &feedback.like.to_string());
        self.set_style("--nope", &feedback.nope.to_string());
        self.set_style("--dim", &feedback.dim.to_string());
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.set_style("visibility", if hidden { "hidden" } else { "visible" });
        self.set_style("pointer-events", if hidden { "none" } else { "auto" });
    }

    fn play(&mut self, id: AnimationId, from: &CardTransform, to: &CardTransform, timing: &Timing) -> bool {
        if !self.animations_supported {
            return false;
        }
        let started = AnimateRequest::new(from, to, timing).and_then(|request| start_animation(&self.element, &request));
        let (animation, finished) = match started {
            Ok(started) => started,
            Err(e) => {
                log::warn!("[SWIPE] {}, jumping to the end instead", e);
                return false;
            }
        };

        let on_settled = self.on_settled.clone();
        wasm_bindgen_futures::spawn_local(async move {
            // Cancelled animations reject, their owner already moved on
            if wasm_bindgen_futures::JsFuture::from(finished).await.is_ok() {
                on_settled(id);
            }
        });

        self.running = Some((id, animation));
        true
    }

    fn cancel(&mut self, id: AnimationId) -> Option<CardTransform> {
        let (running_id, animation) = self.running.take()?;
        // Read before cancelling, the computed style still includes the animation
        let reached = self.rendered_transform();
        animation.cancel();
        if running_id != id {
            log::debug!("[SWIPE] Cancelled animation {:?} while {:?} was expected", running_id, id);
        }
        reached
    }
}

/// Why a transition could not be handed to `Element.animate`
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AnimateError {
    #[error("Non-finite {0} in animation request")]
    InvalidValue(&'static str),
    #[error("Element.animate is not a function")]
    Unsupported,
    #[error("Element.animate failed: {0}")]
    Call(String),
    #[error("Animation has no finished promise")]
    NoFinished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub transform: String,
    pub opacity: f64,
}

impl Keyframe {
    fn of(t: &CardTransform) -> Self {
        Self { transform: t.to_css(), opacity: t.opacity }
    }
}

/// Arguments of one `Element.animate` call, as plain data
#[derive(Clone, Debug, PartialEq)]
pub struct AnimateRequest {
    pub keyframes: [Keyframe; 2],
    pub duration_ms: f64,
    pub easing: &'static str,
    pub fill: &'static str,
}

impl AnimateRequest {
    pub fn new(from: &CardTransform, to: &CardTransform, timing: &Timing) -> Result<Self, AnimateError> {
        for t in [from, to] {
            if ![t.offset_px, t.rotation_deg, t.scale, t.opacity].iter().all(|v| v.is_finite()) {
                return Err(AnimateError::InvalidValue("transform"));
            }
        }
        if !timing.duration_ms.is_finite() || timing.duration_ms < 0.0 {
            return Err(AnimateError::InvalidValue("duration"));
        }
        Ok(Self {
            keyframes: [Keyframe::of(from), Keyframe::of(to)],
            duration_ms: timing.duration_ms,
            easing: timing.easing.css(),
            fill: if timing.hold_end { "forwards" } else { "none" },
        })
    }

    fn keyframes_js(&self) -> Result<js_sys::Array, JsValue> {
        let frames = js_sys::Array::new();
        for frame in &self.keyframes {
            let obj = js_sys::Object::new();
            js_sys::Reflect::set(&obj, &"transform".into(), &frame.transform.as_str().into())?;
            js_sys::Reflect::set(&obj, &"opacity".into(), &frame.opacity.into())?;
            frames.push(&obj);
        }
        Ok(frames)
    }

    fn options_js(&self) -> Result<js_sys::Object, JsValue> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"duration".into(), &self.duration_ms.into())?;
        js_sys::Reflect::set(&options, &"easing".into(), &self.easing.into())?;
        js_sys::Reflect::set(&options, &"fill".into(), &self.fill.into())?;
        Ok(options)
    }
}

fn call_error(e: JsValue) -> AnimateError {
    AnimateError::Call(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Start the transition and return it with its `finished` promise
fn start_animation(
    element: &HtmlElement,
    request: &AnimateRequest,
) -> Result<(web_sys::Animation, js_sys::Promise), AnimateError> {
    let animate = js_sys::Reflect::get(element, &"animate".into())
        .map_err(call_error)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| AnimateError::Unsupported)?;
    let keyframes = request.keyframes_js().map_err(call_error)?;
    let options = request.options_js().map_err(call_error)?;

    let animation = animate
        .call2(element, &keyframes, &options)
        .map_err(call_error)?
        .dyn_into::<web_sys::Animation>()
        .map_err(|_| AnimateError::Call("result is not an Animation".into()))?;
    match animation.finished() {
        Ok(promise) => Ok((animation, promise)),
        Err(_) => {
            animation.cancel();
            Err(AnimateError::NoFinished)
        }
    }
}

pub fn supports_animate(element: &HtmlElement) -> bool {
    js_sys::Reflect::get(element, &"animate".into()).map(|f| f.is_function()).unwrap_or(false)
}

/// 2D part of a CSS transform matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssMatrix {
    pub a: f64,
    pub b: f64,
    pub tx: f64,
}

impl CssMatrix {
    pub const IDENTITY: CssMatrix = CssMatrix { a: 1.0, b: 0.0, tx: 0.0 };

    pub fn to_transform(self, opacity: f64) -> CardTransform {
        CardTransform {
            offset_px: self.tx,
            rotation_deg: self.b.atan2(self.a).to_degrees(),
            scale: self.a.hypot(self.b),
            opacity,
        }
    }
}

/// Parse a computed `transform` value (`none`, `matrix(...)` or `matrix3d(...)`).
pub fn parse_css_matrix(value: &str) -> Option<CssMatrix> {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return Some(CssMatrix::IDENTITY);
    }

    let (args, tx_index) = if let Some(rest) = value.strip_prefix("matrix3d(") {
        (rest, 12)
    } else if let Some(rest) = value.strip_prefix("matrix(") {
        (rest, 4)
    } else {
        return None;
    };

    let numbers: Vec<f64> = args
        .strip_suffix(')')?
        .split(',')
        .map(|n| n.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;

    let expected = if tx_index == 12 { 16 } else { 6 };
    if numbers.len() != expected {
        return None;
    }
    Some(CssMatrix { a: numbers[0], b: numbers[1], tx: numbers[tx_index] })
}

pub fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

/// Pointer event as swipe input. Touch pointers are skipped, the touch
/// adapter reports those.
pub fn pointer_input(ev: &PointerEvent, phase: InputPhase) -> Option<SwipeInput> {
    if ev.pointer_type() == "touch" || !ev.is_primary() {
        return None;
    }
    if phase == InputPhase::Start && ev.button() != 0 {
        return None;
    }
    Some(SwipeInput::new(phase, ev.client_x() as f64, ev.time_stamp()))
}

/// Touch event as swipe input, tracking the first finger only
pub fn touch_input(ev: &TouchEvent, phase: InputPhase) -> Option<SwipeInput> {
    let touch = ev.touches().get(0).or_else(|| ev.changed_touches().get(0))?;
    Some(SwipeInput::new(phase, touch.client_x() as f64, ev.time_stamp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        assert_eq!(parse_css_matrix("none"), Some(CssMatrix::IDENTITY));
        assert_eq!(parse_css_matrix(""), Some(CssMatrix::IDENTITY));
    }

    #[test]
    fn test_parse_matrix() {
        let m = parse_css_matrix("matrix(1, 0, 0, 1, 42.5, 0)").unwrap();
        assert_eq!(m, CssMatrix { a: 1.0, b: 0.0, tx: 42.5 });

        let t = m.to_transform(0.8);
        assert_eq!(t.offset_px, 42.5);
        assert_eq!(t.rotation_deg, 0.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.opacity, 0.8);
    }

    #[test]
    fn test_parse_rotated_matrix() {
        // rotate(30deg) translateX(-80px)
        let (s, c) = 30f64.to_radians().sin_cos();
        let css = format!("matrix({}, {}, {}, {}, -80, 0)", c, s, -s, c);
        let t = parse_css_matrix(&css).unwrap().to_transform(1.0);
        assert!((t.rotation_deg - 30.0).abs() < 1e-6);
        assert!((t.scale - 1.0).abs() < 1e-9);
        assert_eq!(t.offset_px, -80.0);
    }

    #[test]
    fn test_parse_matrix3d() {
        let m = parse_css_matrix("matrix3d(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, -120, 0, 0, 1)").unwrap();
        assert_eq!(m.tx, -120.0);
    }

    #[test]
    fn test_rewind_in_request() {
        let from = CardTransform { offset_px: -24.0, opacity: 0.75, ..CardTransform::REST };
        let request = AnimateRequest::new(&from, &CardTransform::REST, &Timing::stepped(160.0).held()).unwrap();

        assert_eq!(request.easing, "steps(2,end)");
        assert_eq!(request.fill, "forwards");
        assert_eq!(request.duration_ms, 160.0);
        assert_eq!(request.keyframes[0], Keyframe { transform: from.to_css(), opacity: 0.75 });
        assert_eq!(request.keyframes[1].opacity, 1.0);
    }

    #[test]
    fn test_unheld_request_does_not_fill() {
        let request = AnimateRequest::new(&CardTransform::REST, &CardTransform::at(24.0, 0.0), &Timing::ease_out(240.0)).unwrap();
        assert_eq!(request.easing, "ease-out");
        assert_eq!(request.fill, "none");
    }

    #[test]
    fn test_invalid_request_is_refused() {
        let broken = CardTransform::at(f64::NAN, 0.0);
        assert_eq!(
            AnimateRequest::new(&CardTransform::REST, &broken, &Timing::ease_out(240.0)),
            Err(AnimateError::InvalidValue("transform"))
        );
        assert_eq!(
            AnimateRequest::new(&CardTransform::REST, &CardTransform::REST, &Timing::ease_out(f64::INFINITY)),
            Err(AnimateError::InvalidValue("duration"))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_css_matrix("translateX(10px)"), None);
        assert_eq!(parse_css_matrix("matrix(1, 0, 0)"), None);
        assert_eq!(parse_css_matrix("matrix(a, b, c, d, e, f)"), None);
    }
}
