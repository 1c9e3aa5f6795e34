use anyhow::Context;

use crate::map_document::MapDocument;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
    <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.2/Control.FullScreen.css">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.2/Control.FullScreen.js"></script>
    <style>
        html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
        #map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script type="application/json" id="map-spec">"#;

const PAGE_TAIL: &str = r#"</script>
    <script>
        const spec = JSON.parse(document.getElementById('map-spec').textContent);
        const toLatLng = (c) => [c.lat, c.lon];

        const map = L.map('map', { center: toLatLng(spec.center), zoom: spec.zoom });
        const base = L.tileLayer(spec.base_layer.url_template, {
            attribution: spec.base_layer.attribution,
            maxZoom: 19,
        }).addTo(map);

        const overlays = {};
        for (const layer of spec.overlays) {
            overlays[layer.name] = L.tileLayer(layer.url_template, {
                attribution: layer.attribution,
                maxZoom: 19,
            }).addTo(map);
        }
        for (const line of spec.polylines) {
            overlays[line.tooltip] = L.polyline(line.points.map(toLatLng), {
                color: line.color,
                weight: line.weight,
            }).bindTooltip(line.tooltip).addTo(map);
        }
        for (const cluster of spec.marker_clusters) {
            const group = L.markerClusterGroup();
            for (const marker of cluster.markers) {
                L.marker(toLatLng(marker.location)).bindPopup(marker.popup).addTo(group);
            }
            overlays[cluster.name] = group.addTo(map);
        }

        if (spec.fullscreen) {
            L.control.fullscreen({ position: spec.fullscreen }).addTo(map);
        }
        if (spec.layer_control) {
            L.control.layers({ [spec.base_layer.name]: base }, overlays).addTo(map);
        }
        if (spec.fit_bounds) {
            map.fitBounds(spec.fit_bounds.map(toLatLng));
        }
    </script>
</body>
</html>
"#;

/// The map is embedded as JSON inside a script block, so `</` must not appear verbatim or a
/// popup containing `</script>` would end the block early.
pub fn standalone_html(map: &MapDocument) -> anyhow::Result<String> {
    let spec = serde_json::to_string(map).context("serializing map document")?;
    let spec = spec.replace("</", "<\\/");

    let mut html = String::with_capacity(PAGE_HEAD.len() + spec.len() + PAGE_TAIL.len());
    html.push_str(PAGE_HEAD);
    html.push_str(&spec);
    html.push_str(PAGE_TAIL);
    Ok(html)
}

#[cfg(test)]
mod tests {
    use msgs::Coordinate;

    use crate::map_document::{Marker, MarkerCluster, TileLayer};

    use super::*;

    fn embedded_spec(html: &str) -> serde_json::Value {
        let begin = html.find(r#"id="map-spec">"#).unwrap() + r#"id="map-spec">"#.len();
        let end = begin + html[begin..].find("</script>").unwrap();
        serde_json::from_str(&html[begin..end]).unwrap()
    }

    #[test]
    fn embeds_map_as_json() {
        let mut map = MapDocument::new(
            Coordinate::new(54.5, -3.0),
            6,
            TileLayer::base("Base", "https://tiles.test/{z}/{x}/{y}.png", "test"),
        );
        let mut cluster = MarkerCluster::new("Collisions");
        cluster.add_marker(Marker {
            location: Coordinate::new(51.5, -0.1),
            popup: "Date: 2022-01-01<br>hi </script><script>alert(1)".to_string(),
        });
        map.add_marker_cluster(cluster);

        let html = map.to_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("</script><script>alert(1)"));

        let spec = embedded_spec(&html);
        assert_eq!(spec["zoom"], 6);
        assert_eq!(spec["center"]["lat"], 54.5);
        assert_eq!(spec["marker_clusters"][0]["markers"][0]["location"]["lon"], -0.1);
        assert_eq!(
            spec["marker_clusters"][0]["markers"][0]["popup"],
            "Date: 2022-01-01<br>hi </script><script>alert(1)"
        );
    }
}
