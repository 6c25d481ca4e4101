//! C ABI surface for the TLC spot detector.
//!
//! Mirrors the mobile-plugin boundary: callers pass a NUL-terminated
//! image path plus optional baseline/topline references (`-1` = not
//! supplied) and receive either a JSON array of spots or a success
//! flag. Panics never cross the boundary; every failure maps to the
//! empty result.

use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

use tlc_spots::{detect_plate, detect_spots_json};

fn path_from_ptr<'a>(path: *const c_char) -> Option<&'a str> {
    if path.is_null() {
        return None;
    }
    // Caller contract: NUL-terminated string, valid for the call.
    unsafe { CStr::from_ptr(path) }.to_str().ok()
}

fn into_c_string(json: String) -> *mut c_char {
    // Spot JSON never contains interior NULs; fall back defensively.
    CString::new(json)
        .unwrap_or_else(|_| CString::new("[]").expect("static JSON"))
        .into_raw()
}

/// Detect spots on the plate image at `path` and return a JSON array of
/// `{"x","y","rf_value"}` objects, `"[]"` on any failure.
///
/// `baseline_y` and `topline_y` are Y coordinates in the original
/// image; pass `-1` for either to disable band normalization. The
/// annotated canonical image overwrites the input file on success.
///
/// The returned string must be released with
/// [`tlc_spots_string_free`]. Returns NULL only when `path` is NULL or
/// not valid UTF-8.
#[no_mangle]
pub extern "C" fn tlc_spots_detect_json(
    path: *const c_char,
    baseline_y: i32,
    topline_y: i32,
) -> *mut c_char {
    let Some(path) = path_from_ptr(path) else {
        return std::ptr::null_mut();
    };

    let json = catch_unwind(AssertUnwindSafe(|| {
        detect_spots_json(path, baseline_y, topline_y)
    }))
    .unwrap_or_else(|_| "[]".to_string());

    into_c_string(json)
}

/// Boolean variant: `true` once the annotated image has been written,
/// `false` on load failure or any internal fault.
#[no_mangle]
pub extern "C" fn tlc_spots_detect(path: *const c_char) -> bool {
    let Some(path) = path_from_ptr(path) else {
        return false;
    };

    catch_unwind(AssertUnwindSafe(|| detect_plate(path))).unwrap_or(false)
}

/// Release a string returned by [`tlc_spots_detect_json`].
#[no_mangle]
pub extern "C" fn tlc_spots_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        // Ownership round-trips through the same allocator.
        drop(unsafe { CString::from_raw(ptr) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_path(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let out = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        tlc_spots_string_free(ptr);
        out
    }

    #[test]
    fn null_path_returns_null_and_false() {
        assert!(tlc_spots_detect_json(std::ptr::null(), -1, -1).is_null());
        assert!(!tlc_spots_detect(std::ptr::null()));
    }

    #[test]
    fn missing_file_returns_empty_array() {
        let path = c_path("/nonexistent/plate.png");
        let json = take_string(tlc_spots_detect_json(path.as_ptr(), -1, -1));
        assert_eq!(json, "[]");
        assert!(!tlc_spots_detect(path.as_ptr()));
    }

    fn draw_spot(img: &mut image::RgbImage, cx: i32, cy: i32, r: i32) {
        for y in (cy - r).max(0)..=(cy + r).min(img.height() as i32 - 1) {
            for x in (cx - r).max(0)..=(cx + r).min(img.width() as i32 - 1) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    img.put_pixel(x as u32, y as u32, image::Rgb([70, 60, 90]));
                }
            }
        }
    }

    #[test]
    fn detects_on_a_real_file_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plate.png");
        let mut img = image::RgbImage::from_pixel(256, 500, image::Rgb([185, 185, 180]));
        draw_spot(&mut img, 128, 250, 14);
        img.save(&path).unwrap();

        let c = c_path(path.to_str().unwrap());
        let json = take_string(tlc_spots_detect_json(c.as_ptr(), -1, -1));
        assert!(json.starts_with('['));
        assert_ne!(json, "[]");
    }

    #[test]
    fn string_free_accepts_null() {
        tlc_spots_string_free(std::ptr::null_mut());
    }
}
