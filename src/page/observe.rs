//! IntersectionObserver wiring: reveal-on-scroll entrance animations and the
//! lazy-image fallback for environments without native `loading="lazy"`.
//!
//! Both observers are one-way: a target that has intersected once is
//! unobserved and never reverts.

#[cfg(target_arch = "wasm32")]
use js_sys::Array;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    Document, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

#[cfg(target_arch = "wasm32")]
use super::{elements_matching, PageFx, ANIMATED_SELECTOR, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD, VISIBLE_CLASS};

#[cfg(target_arch = "wasm32")]
type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

#[cfg(target_arch = "wasm32")]
impl PageFx {
    /// Observe the animated elements; first intersection applies the
    /// `visible` class that triggers the CSS entrance animation.
    pub(crate) fn setup_reveal_observer(
        document: &Document,
    ) -> (Option<IntersectionObserver>, Option<ObserverCallback>) {
        let targets = elements_matching(document, ANIMATED_SELECTOR);
        if targets.is_empty() {
            return (None, None);
        }

        let closure = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        let _ = target.class_list().add_1(VISIBLE_CLASS);
                        observer.unobserve(&target);
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        init.set_root_margin(REVEAL_ROOT_MARGIN);
        let Ok(observer) =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
        else {
            return (None, None);
        };
        for target in &targets {
            observer.observe(target);
        }
        (Some(observer), Some(closure))
    }

    /// Fallback lazy loading: swap `data-src` into `src` on first
    /// intersection. Skipped entirely when the environment lazy-loads
    /// natively.
    pub(crate) fn setup_lazy_images(
        document: &Document,
    ) -> (Option<IntersectionObserver>, Option<ObserverCallback>) {
        if Self::supports_native_lazy_loading(document) {
            return (None, None);
        }
        let images = elements_matching(document, r#"img[loading="lazy"]"#);
        if images.is_empty() {
            return (None, None);
        }

        let closure = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    let Ok(img) = target.dyn_into::<HtmlImageElement>() else {
                        continue;
                    };
                    if let Some(src) = img.dataset().get("src") {
                        img.set_src(&src);
                    }
                    let _ = img.class_list().add_1("loaded");
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let Ok(observer) = IntersectionObserver::new(closure.as_ref().unchecked_ref()) else {
            return (None, None);
        };
        for image in &images {
            observer.observe(image);
        }
        (Some(observer), Some(closure))
    }

    fn supports_native_lazy_loading(document: &Document) -> bool {
        let Ok(probe) = document.create_element("img") else {
            return false;
        };
        js_sys::Reflect::has(probe.as_ref(), &JsValue::from_str("loading")).unwrap_or(false)
    }
}
