pub mod course;
pub mod layout;
pub mod leveling;
pub mod measure;
pub mod selection;
pub mod svg;

use wasm_bindgen::prelude::*;

use course::CourseDataset;
use layout::{LayoutEngine, LayoutOptions, NodeStub, TangleLayout};
use selection::Selection;
use svg::SvgRenderer;

/// Initialize panic hook and console logging for WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Warn);
    }
}

/// Level a course dataset and lay it out.
pub fn layout_courses(dataset: &CourseDataset, options: LayoutOptions) -> TangleLayout {
    let leveling = leveling::level_courses(dataset);
    LayoutEngine::new(options).layout(&leveling.levels)
}

fn parse_options(options_json: Option<&str>) -> Result<LayoutOptions, String> {
    let options: LayoutOptions = match options_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(json).map_err(|e| e.to_string())?
        }
        _ => LayoutOptions::default(),
    };
    options.validate().map_err(|e| e.to_string())?;
    Ok(options)
}

fn parse_levels(levels_json: &str) -> Result<Vec<Vec<NodeStub>>, String> {
    serde_json::from_str(levels_json).map_err(|e| e.to_string())
}

/// Render a course dataset to SVG, optionally with one course selected.
#[wasm_bindgen(js_name = "courseTreeToSvg")]
pub fn course_tree_to_svg(
    dataset_json: &str,
    selected: Option<String>,
    options_json: Option<String>,
) -> Result<String, String> {
    let dataset = CourseDataset::from_json(dataset_json).map_err(|e| e.to_string())?;
    let options = parse_options(options_json.as_deref())?;
    let layout = layout_courses(&dataset, options);

    let mut selection = Selection::new();
    if let Some(id) = selected.as_deref() {
        selection.pointer_enter(&layout, id);
    }

    Ok(SvgRenderer::default().render(&layout, Some(&selection)))
}

/// Lay out already leveled nodes and return the layout as JSON.
#[wasm_bindgen(js_name = "tangleLayoutJson")]
pub fn tangle_layout_json(levels_json: &str, options_json: Option<String>) -> Result<String, String> {
    let levels = parse_levels(levels_json)?;
    let options = parse_options(options_json.as_deref())?;
    let layout = LayoutEngine::new(options).layout(&levels);
    serde_json::to_string(&layout).map_err(|e| e.to_string())
}

/// Ancestor and descendant ids of one node of a leveled input, as
/// `[ancestors, descendants]`.
#[wasm_bindgen(js_name = "relatedNodes")]
pub fn related_nodes(levels_json: &str, id: &str) -> Result<js_sys::Array, String> {
    let levels = parse_levels(levels_json)?;
    let layout = LayoutEngine::default().layout(&levels);

    let mut selection = Selection::new();
    selection.pointer_enter(&layout, id);

    let to_array = |ids: &std::collections::BTreeSet<String>| {
        ids.iter()
            .map(|id| JsValue::from_str(id))
            .collect::<js_sys::Array>()
    };
    let result = js_sys::Array::new();
    result.push(&to_array(selection.ancestor_ids()));
    result.push(&to_array(selection.descendant_ids()));
    Ok(result)
}
