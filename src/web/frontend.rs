//! Embedded HTML/CSS/JS frontend for the checkrr-dash web dashboard.
//!
//! The page is compiled into the binary. It holds no state of its own: each
//! panel polls its `/view/*` endpoint on its own timer and redraws from the
//! view model the server's pollers keep current.

/// Placeholder replaced with the polling interval in milliseconds.
pub const INTERVAL_PLACEHOLDER: &str = "__INTERVAL_MS__";

/// The page with the polling interval filled in.
pub fn index_html(interval_ms: u128) -> String {
    INDEX_HTML.replace(INTERVAL_PLACEHOLDER, &interval_ms.to_string())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>checkrr</title>
<style>
:root {
  --bg: #121212;
  --surface: #1e1e1e;
  --border: #333;
  --text: #e6e6e6;
  --muted: #9e9e9e;
  --accent: #90caf9;
  --warn: #ffa726;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--mono); font-size: 14px; }
nav { display: flex; gap: 24px; align-items: center; padding: 12px 24px; background: #272727; }
nav .brand { font-weight: 700; letter-spacing: .3rem; }
nav .grow { flex-grow: 1; }
button { background: var(--accent); color: #000; border: 0; border-radius: 4px; padding: 6px 12px; cursor: pointer; font-family: inherit; }
button:disabled { opacity: .4; cursor: default; }
button.warn { background: var(--warn); }
main { max-width: 1400px; margin: 0 auto; padding: 24px; display: grid; gap: 24px; }
section { background: var(--surface); border-radius: 8px; padding: 20px; }
h2 { font-size: 16px; margin-bottom: 12px; letter-spacing: .05rem; }
h3 { font-size: 13px; color: var(--muted); margin-bottom: 8px; }
.charts { display: grid; grid-template-columns: 1fr 2fr; gap: 24px; }
.pie { width: 220px; height: 220px; border-radius: 50%; margin: 0 auto 12px; background: var(--border); }
.legend { list-style: none; font-size: 12px; }
.legend li { display: flex; gap: 8px; align-items: center; }
.swatch { width: 10px; height: 10px; display: inline-block; }
svg { width: 100%; height: 260px; background: #181818; }
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); }
.muted { color: var(--muted); }
</style>
</head>
<body>
<nav>
  <span class="brand">checkrr</span>
  <button id="run">Run Now</button>
  <span id="state" class="grow muted">loading…</span>
  <span id="next"></span>
  <span id="last"></span>
</nav>
<main>
  <section>
    <h2>Stats</h2>
    <div class="charts">
      <div>
        <h3>Last Run</h3>
        <div id="pie" class="pie"></div>
        <ul id="pie-legend" class="legend"></ul>
      </div>
      <div>
        <h3>Historical Stats</h3>
        <svg id="line" viewBox="0 0 800 260" preserveAspectRatio="none"></svg>
        <ul id="line-legend" class="legend"></ul>
      </div>
    </div>
  </section>
  <section>
    <h2>Bad Files</h2>
    <p><button id="delete" class="warn">Delete selected rows</button>
      <span class="muted">Only the records are removed, never the files.</span></p>
    <table>
      <thead><tr><th></th><th>ID</th><th>Path</th><th>File Extension</th><th>Reacquired</th><th>Service</th></tr></thead>
      <tbody id="rows"></tbody>
    </table>
  </section>
</main>
<script>
const INTERVAL = __INTERVAL_MS__;
const timers = [];

async function getJson(url) {
  const res = await fetch(url);
  if (!res.ok) throw new Error(`HTTP ${res.status}: ${await res.text()}`);
  return res.json();
}

async function postJson(url, body) {
  const res = await fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  const data = await res.json().catch(() => null);
  if (!res.ok) throw new Error((data && data.error) || `HTTP ${res.status}`);
  return data;
}

function poll(fn) {
  const tick = () => fn().catch(err => console.warn(err));
  tick();
  timers.push(setInterval(tick, INTERVAL));
}

function esc(s) {
  return String(s).replace(/[&<>"]/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c]));
}

async function loadStatus() {
  const bar = await getJson('/view/status');
  if (!bar) return;
  document.getElementById('state').textContent = bar.state;
  document.getElementById('next').textContent = 'Next Run: ' + bar.next_run;
  document.getElementById('last').textContent = 'Last Run: ' + bar.last_run;
  document.getElementById('run').disabled = bar.running;
}

function drawPie(pie) {
  const slices = pie.values.map(v => Math.max(0, v));
  const total = slices.reduce((a, b) => a + b, 0);
  let acc = 0;
  const stops = slices.map((v, i) => {
    const from = total ? acc / total * 360 : 0;
    acc += v;
    const to = total ? acc / total * 360 : 0;
    return `${pie.colors[i]} ${from}deg ${to}deg`;
  });
  document.getElementById('pie').style.background = stops.length ? `conic-gradient(${stops.join(',')})` : '';
  document.getElementById('pie-legend').innerHTML = pie.labels.map((l, i) =>
    `<li><span class="swatch" style="background:${pie.colors[i]}"></span>${esc(l)}: ${pie.values[i]}</li>`).join('');
}

function drawLine(line) {
  const svg = document.getElementById('line');
  const n = line.labels.length;
  const max = Math.max(1, ...line.series.flatMap(s => s.values.filter(v => v !== null)));
  const x = i => n > 1 ? i / (n - 1) * 780 + 10 : 400;
  const y = v => 250 - v / max * 240;
  svg.innerHTML = line.series.map(s => {
    // Gaps split the polyline instead of dropping to zero.
    const runs = [[]];
    s.values.forEach((v, i) => v === null ? runs.push([]) : runs[runs.length - 1].push(`${x(i)},${y(v)}`));
    return runs.filter(r => r.length).map(r =>
      `<polyline fill="none" stroke="${s.color}" stroke-width="2" points="${r.join(' ')}"/>`).join('');
  }).join('');
  document.getElementById('line-legend').innerHTML = line.series
    .filter(s => s.values.some(v => v !== null))
    .map(s => `<li><span class="swatch" style="background:${s.color}"></span>${esc(s.label)}</li>`).join('');
}

async function loadStats() {
  const stats = await getJson('/view/stats');
  if (!stats) return;
  drawPie(stats.pie);
  drawLine(stats.line);
}

// Grid ids are positions in the latest listing, so the selection is kept by
// path and turned back into ids only when a delete is sent.
const selectedPaths = new Set();
let currentRows = [];

async function loadFiles() {
  const rows = await getJson('/view/files');
  if (!rows) return;
  currentRows = rows;
  const present = new Set(rows.map(r => r.path));
  [...selectedPaths].filter(p => !present.has(p)).forEach(p => selectedPaths.delete(p));
  document.getElementById('rows').innerHTML = rows.map(r =>
    `<tr><td><input type="checkbox" data-path="${esc(r.path)}" ${selectedPaths.has(r.path) ? 'checked' : ''}></td>` +
    `<td>${r.id}</td><td>${esc(r.path)}</td><td>${esc(r.ext)}</td><td>${r.reacquire}</td><td>${esc(r.service)}</td></tr>`).join('');
}

function selectedIds() {
  return currentRows.filter(r => selectedPaths.has(r.path)).map(r => r.id);
}

document.getElementById('rows').addEventListener('change', e => {
  const path = e.target.dataset.path;
  if (path === undefined) return;
  if (e.target.checked) selectedPaths.add(path); else selectedPaths.delete(path);
});

document.getElementById('run').addEventListener('click', async () => {
  document.getElementById('run').disabled = true;
  document.getElementById('state').textContent = 'Running';
  try { await postJson('/action/run', {}); } catch (err) { console.warn(err); }
});

document.getElementById('delete').addEventListener('click', async () => {
  const ids = selectedIds();
  if (!ids.length) return;
  if (!confirm("Are you sure you want to delete these entries?\n\ncheckrr doesn't support deleting files via the dashboard. This will just delete the records from the list.")) return;
  try { await postJson('/action/delete', ids); } catch (err) { alert(err.message); }
  selectedPaths.clear();
  document.getElementById('rows').innerHTML = '';
  loadFiles().catch(err => console.warn(err));
});

window.addEventListener('pagehide', () => timers.forEach(clearInterval));

poll(loadStatus);
poll(loadStats);
poll(loadFiles);
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_filled_in() {
        let html = index_html(10_000);
        assert!(html.contains("const INTERVAL = 10000;"));
        assert!(!html.contains(INTERVAL_PLACEHOLDER));
    }

    #[test]
    fn selection_is_keyed_by_path() {
        let html = index_html(1);
        assert!(html.contains("data-path=\"${esc(r.path)}\""));
        assert!(html.contains("selectedPaths.has(r.path)"));
        assert!(!html.contains("value=\"${r.id}\""));
    }

    #[test]
    fn page_polls_every_view() {
        let html = index_html(1);
        for endpoint in ["/view/status", "/view/stats", "/view/files", "/action/run", "/action/delete"] {
            assert!(html.contains(endpoint), "missing {endpoint}");
        }
    }
}
