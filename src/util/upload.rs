use crate::api::FileUpload;
use crate::util::square_crop_rect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, CanvasRenderingContext2d, File, HtmlCanvasElement, HtmlImageElement, Url};

pub(crate) async fn blob_bytes(blob: &Blob) -> Result<Vec<u8>, JsValue> {
    let buf = JsFuture::from(blob.array_buffer()).await?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// First file selected in a file input, read into memory.
pub(crate) async fn read_selected_file(
    input: &web_sys::HtmlInputElement,
) -> Result<Option<FileUpload>, JsValue> {
    let Some(file) = input.files().and_then(|list| list.get(0)) else {
        return Ok(None);
    };
    let bytes = blob_bytes(&file).await?;
    let mime = file.type_();

    Ok(Some(FileUpload {
        file_name: file.name(),
        mime: if mime.is_empty() {
            "application/octet-stream".to_string()
        } else {
            mime
        },
        bytes,
    }))
}

/// Tracks the `blob:` URL behind an image preview so it can be revoked once replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PreviewUrl(Option<String>);

impl PreviewUrl {
    /// Swaps in `url`; returns the URL it replaced, which the caller revokes.
    pub fn replace(&mut self, url: String) -> Option<String> {
        self.0.replace(url)
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }
}

pub(crate) fn revoke_object_url(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        log::warn!("failed to revoke preview url: {e:?}");
    }
}

/// Avatar after the square crop: upload payload plus an object URL for the preview.
pub(crate) struct CroppedImage {
    pub upload: FileUpload,
    pub preview_url: String,
}

/// Crops `file` to its centered square and re-encodes it as JPEG.
pub(crate) async fn crop_to_square_jpeg(file: &File) -> Result<CroppedImage, JsValue> {
    let source_url = Url::create_object_url_with_blob(file)?;
    let img = HtmlImageElement::new()?;
    img.set_src(&source_url);
    let decoded = JsFuture::from(img.decode()).await;
    Url::revoke_object_url(&source_url)?;
    decoded?;

    let (sx, sy, size) =
        square_crop_rect(f64::from(img.natural_width()), f64::from(img.natural_height()));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(size as u32);
    canvas.set_height(size as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        &img, sx, sy, size, size, 0.0, 0.0, size, size,
    )?;

    let blob = canvas_to_blob(&canvas, "image/jpeg", 0.9).await?;
    let preview_url = Url::create_object_url_with_blob(&blob)?;
    let bytes = blob_bytes(&blob).await?;

    Ok(CroppedImage {
        upload: FileUpload {
            file_name: "avatar.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes,
        },
        preview_url,
    })
}

async fn canvas_to_blob(
    canvas: &HtmlCanvasElement,
    mime: &str,
    quality: f64,
) -> Result<Blob, JsValue> {
    let mut failure = None;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let on_blob = Closure::once_into_js(move |blob: JsValue| {
            let _ = if blob.is_null() {
                reject.call1(&JsValue::NULL, &JsValue::from_str("canvas produced no image"))
            } else {
                resolve.call1(&JsValue::NULL, &blob)
            };
        });
        if let Err(e) = canvas.to_blob_with_type_and_encoder_options(
            on_blob.unchecked_ref(),
            mime,
            &JsValue::from_f64(quality),
        ) {
            failure = Some(e);
        }
    });

    // The callback never fires when toBlob itself threw.
    if let Some(e) = failure {
        return Err(e);
    }
    JsFuture::from(promise).await?.dyn_into::<Blob>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_url_hands_back_replaced_url() {
        let mut preview = PreviewUrl::default();
        assert_eq!(preview.replace("blob:a".to_string()), None);
        assert_eq!(preview.replace("blob:b".to_string()).as_deref(), Some("blob:a"));
        assert_eq!(preview.take().as_deref(), Some("blob:b"));
        assert_eq!(preview.take(), None);
    }
}
