//! DOM geometry and focus operations for CDP page session.

use serde_json::json;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Border quads of an element in viewport coordinates. Empty when it has no layout.
    pub async fn content_quads(&self, object_id: &str) -> Result<Vec<Vec<f64>>, CdpError> {
        let result = self
            .call("DOM.getContentQuads", Some(json!({"objectId": object_id})))
            .await;

        match result {
            Ok(r) => {
                let quads: Vec<Vec<f64>> =
                    serde_json::from_value(r["quads"].clone()).unwrap_or_default();
                Ok(quads)
            }
            Err(CdpError::Protocol { message, .. })
                if message.contains("Could not compute content quads") =>
            {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Scroll the element into view if it is outside the viewport.
    pub async fn scroll_into_view(&self, object_id: &str) -> Result<(), CdpError> {
        self.call(
            "DOM.scrollIntoViewIfNeeded",
            Some(json!({"objectId": object_id})),
        )
        .await?;
        Ok(())
    }

    /// Focus element.
    pub async fn focus_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("DOM.focus", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }

    /// Centre of the first quad with a non-zero area.
    pub fn first_visible_center(quads: &[Vec<f64>]) -> Option<(f64, f64)> {
        quads
            .iter()
            .filter(|q| q.len() >= 8 && Self::quad_area(q) > 1.0)
            .map(|q| Self::quad_center(q))
            .next()
    }

    /// Calculate center point of a quad.
    pub(super) fn quad_center(quad: &[f64]) -> (f64, f64) {
        if quad.len() >= 8 {
            let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
            let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
            (x, y)
        } else {
            (0.0, 0.0)
        }
    }

    /// Shoelace area of a four-point quad.
    pub(super) fn quad_area(quad: &[f64]) -> f64 {
        let mut area = 0.0;
        for i in 0..4 {
            let (x1, y1) = (quad[i * 2], quad[i * 2 + 1]);
            let j = (i + 1) % 4;
            let (x2, y2) = (quad[j * 2], quad[j * 2 + 1]);
            area += x1 * y2 - x2 * y1;
        }
        (area / 2.0).abs()
    }
}
