/// The combined dashboard: search, route planner and collision map stacked in one page. Maps
/// arrive over the websocket as complete documents and replace the matching frame wholesale.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Traffic Management Dashboard</title>
    <style>
        body {
            font-family: system-ui, sans-serif;
            margin: 24px;
            background: #f5f5f5;
        }
        section {
            background: white;
            padding: 16px 24px;
            margin-bottom: 24px;
            border-radius: 8px;
            width: 1100px;
        }
        .controls { display: flex; gap: 8px; align-items: center; margin-bottom: 8px; }
        input[type="text"] {
            border: 2px solid #4CAF50;
            border-radius: 4px;
            padding: 6px 8px;
            width: 280px;
        }
        button {
            border: none;
            border-radius: 4px;
            padding: 8px 16px;
            cursor: pointer;
        }
        .btn-success, .btn-primary {
            background-color: #4CAF50;
            color: white;
        }
        .filter { display: inline-flex; margin-bottom: 8px; }
        .filter input { display: none; }
        .filter label {
            padding: 6px 14px;
            border: 1px solid #4CAF50;
            cursor: pointer;
        }
        .filter label:first-of-type { border-radius: 4px 0 0 4px; }
        .filter label:last-of-type { border-radius: 0 4px 4px 0; }
        .filter input:checked + label { background-color: #4CAF50; color: white; }
        .status { min-height: 1.4em; color: #666; }
        .status.error { color: #c62828; }
        iframe {
            width: 1100px;
            height: 900px;
            border: 1px solid #ddd;
        }
    </style>
</head>
<body>
    <section>
        <h1>Traffic Management Dashboard</h1>
        <p>Search and filter traffic data to display on the map.</p>
        <div class="controls">
            <input type="text" id="search-input" placeholder="Enter a location...">
            <button id="search-button" class="btn-success">Search</button>
        </div>
        <div class="filter" title="Select Data to Display">
            <input type="radio" name="filter" id="filter-all" value="All" checked><label for="filter-all">All</label>
            <input type="radio" name="filter" id="filter-traffic" value="Traffic"><label for="filter-traffic">Traffic</label>
            <input type="radio" name="filter" id="filter-accidents" value="Accidents"><label for="filter-accidents">Accidents</label>
            <input type="radio" name="filter" id="filter-closures" value="Road Closures"><label for="filter-closures">Road Closures</label>
        </div>
        <div class="status" id="search-status"></div>
        <iframe id="search-map" title="Search map"></iframe>
    </section>

    <section>
        <h1>Route Planner</h1>
        <div class="controls">
            <input type="text" id="start-input" placeholder="Enter start location...">
            <input type="text" id="end-input" placeholder="Enter end location...">
            <button id="route-button" class="btn-primary">Show Route</button>
        </div>
        <div class="status" id="route-status"></div>
        <iframe id="route-map" title="Route map"></iframe>
    </section>

    <section>
        <h1>Traffic and Collision Data Visualization</h1>
        <iframe id="collisions-map" title="Collision map" src="/collisions"></iframe>
    </section>

    <script>
        const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
        let socket = null;

        function setStatus(panel, text, isError) {
            const status = document.getElementById(panel + '-status');
            if (!status) return;
            status.textContent = text || '';
            status.classList.toggle('error', !!isError);
        }

        function handle(msg) {
            switch (msg.type) {
                case 'loading':
                    setStatus(msg.panel, 'Loading...');
                    break;
                case 'map_updated':
                    document.getElementById(msg.panel + '-map').srcdoc = msg.html;
                    setStatus(msg.panel, msg.notice, !!msg.notice);
                    break;
                case 'failed':
                    setStatus(msg.panel, msg.message, true);
                    break;
                case 'pong':
                    break;
            }
        }

        function connect() {
            socket = new WebSocket(`${protocol}//${window.location.host}/api/ws`);
            // The first map, and the one after a reconnect, follow the current inputs
            socket.onopen = updateView;
            socket.onmessage = (event) => handle(JSON.parse(event.data));
            socket.onclose = () => {
                setStatus('search', 'Disconnected, reconnecting...', true);
                setTimeout(connect, 2000);
            };
        }

        function send(msg) {
            if (socket && socket.readyState === WebSocket.OPEN) {
                socket.send(JSON.stringify(msg));
            }
        }

        function updateView() {
            send({
                UpdateView: {
                    address: document.getElementById('search-input').value,
                    filter: document.querySelector('input[name="filter"]:checked').value,
                },
            });
        }

        document.getElementById('search-button').onclick = updateView;
        document.querySelectorAll('input[name="filter"]').forEach((radio) => radio.onchange = updateView);
        document.getElementById('route-button').onclick = () => send({
            PlanRoute: {
                start: document.getElementById('start-input').value,
                end: document.getElementById('end-input').value,
            },
        });
        setInterval(() => send('Ping'), 30000);

        connect();
    </script>
</body>
</html>"#;
