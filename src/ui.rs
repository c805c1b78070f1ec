use crate::models::User;

pub fn render_index(user: Option<&User>, date: &str, tip: &str) -> String {
    let greeting = match user {
        Some(user) if !user.name.trim().is_empty() => format!("Hello, {}", escape_html(user.name.trim())),
        Some(user) => format!("Hello, {}", escape_html(&user.email)),
        None => "Welcome".to_string(),
    };

    INDEX_HTML
        .replace("{{GREETING}}", &greeting)
        .replace("{{DATE}}", date)
        .replace("{{TIP}}", &escape_html(tip))
        .replace("{{SIGNED_IN}}", if user.is_some() { "true" } else { "false" })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Health Tracker</title>
  <style>
    :root {
      --bg: #eef4fb;
      --ink: #223344;
      --accent: #0868d8;
      --ok: #28a745;
      --warn: #ffc107;
      --bad: #dc3545;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 18px 48px rgba(8, 104, 216, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #ffffff 70%);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      display: grid;
      gap: 22px;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 14px;
    }

    h1, h2 {
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f6b78;
    }

    form {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
    }

    input {
      flex: 1 1 160px;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #c9d6e4;
      font-size: 0.95rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button:disabled {
      background: #8e99a4;
      cursor: default;
    }

    .dose {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 14px;
      border-radius: 12px;
      background: #f8f9fa;
      border-left: 4px solid var(--accent);
    }

    .dose.taken {
      background: #d4edda;
      border-left-color: var(--ok);
    }

    .bar {
      background: #e9ecef;
      border-radius: 10px;
      height: 28px;
      overflow: hidden;
    }

    .bar > div {
      height: 100%;
      color: white;
      font-weight: 600;
      display: flex;
      align-items: center;
      justify-content: center;
      transition: width 0.5s ease;
    }

    .status {
      min-height: 1.2em;
      color: #5f6b78;
    }

    .status[data-type="error"] {
      color: var(--bad);
    }

    .status[data-type="ok"] {
      color: var(--ok);
    }

    [hidden] {
      display: none !important;
    }
  </style>
</head>
<body>
  <main class="app" data-signed-in="{{SIGNED_IN}}">
    <header class="card">
      <h1 id="greeting">{{GREETING}}</h1>
      <p class="subtitle">Today is <span id="date">{{DATE}}</span>. {{TIP}}</p>
      <p id="status" class="status"></p>
    </header>

    <section id="login" class="card" hidden>
      <h2>Log in</h2>
      <form id="login-form">
        <input id="email" type="email" placeholder="Email" required />
        <input id="password" type="password" placeholder="Password" required />
        <button type="submit">Log in</button>
      </form>
    </section>

    <section id="tracker" class="card" hidden>
      <div style="display:flex; justify-content:space-between; align-items:center;">
        <h2>Today's medications</h2>
        <button id="logout" type="button">Log out</button>
      </div>
      <div>
        <strong>Progress</strong>
        <span id="progress-count" style="float:right;"></span>
      </div>
      <div class="bar"><div id="progress-bar" style="width:0%; background:linear-gradient(90deg, #28a745, #20c997);">0%</div></div>
      <p id="progress-done" class="status" data-type="ok" hidden>All medications taken today! Great job!</p>
      <div id="schedule"></div>

      <h2>Add medication</h2>
      <form id="med-form">
        <input id="med-name" placeholder="Name" required />
        <input id="med-dosage" placeholder="Dosage" required />
        <input id="med-frequency" placeholder="Times, e.g. 09:00 AM, 09:00 PM" required />
        <input id="med-duration" type="number" min="1" placeholder="Days" required />
        <button type="submit">Add</button>
      </form>

      <h2>Water</h2>
      <form id="water-form">
        <input id="water" type="number" min="0" max="10000" placeholder="ml today" />
        <button type="submit">Save</button>
      </form>
      <div class="bar"><div id="water-bar" style="width:0%;">0%</div></div>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const scheduleEl = document.getElementById('schedule');
    const WATER_COLORS = { low: '#dc3545', medium: '#ffc107', good: '#28a745' };

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const api = async (path, body) => {
      const options = body === undefined
        ? {}
        : { method: 'POST', headers: { 'content-type': 'application/json' }, body: JSON.stringify(body) };
      const res = await fetch(path, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const escapeText = (text) => {
      const span = document.createElement('span');
      span.textContent = text;
      return span.innerHTML;
    };

    const renderSchedule = (view) => {
      const { progress } = view;
      document.getElementById('progress-count').textContent = `${progress.taken} / ${progress.total} doses`;
      const bar = document.getElementById('progress-bar');
      bar.style.width = `${progress.percentage}%`;
      bar.textContent = `${progress.percentage}%`;
      document.getElementById('progress-done').hidden = !progress.complete;

      if (view.notice === 'no_medications') {
        scheduleEl.innerHTML = '<p class="subtitle">No medications scheduled for today.</p>';
        return;
      }
      if (view.notice === 'nothing_due') {
        scheduleEl.innerHTML = '<p class="subtitle">No doses are due today.</p>';
        return;
      }

      scheduleEl.innerHTML = '';
      view.doses.forEach((dose) => {
        const row = document.createElement('div');
        row.className = dose.taken_at ? 'dose taken' : 'dose';
        row.innerHTML = `
          <div>
            <strong>${escapeText(dose.medication_name)}</strong> - ${escapeText(dose.dosage)}<br>
            <span>${escapeText(dose.time_label)}</span>
            ${dose.taken_at ? `<br><span style="color:#28a745; font-weight:600;">Taken at ${escapeText(dose.taken_at)}</span>` : ''}
          </div>`;
        const button = document.createElement('button');
        button.textContent = dose.taken_at ? 'Taken' : 'Mark taken';
        button.disabled = Boolean(dose.taken_at);
        button.addEventListener('click', () => {
          button.disabled = true;
          api('/api/schedule/taken', { medication_id: dose.medication_id, time_label: dose.time_label })
            .then((out) => {
              if (out.schedule) {
                renderSchedule(out.schedule);
              } else {
                button.textContent = 'Taken';
                row.className = 'dose taken';
              }
              setStatus(`${dose.medication_name} marked as taken`, 'ok');
            })
            .catch((err) => {
              button.disabled = false;
              setStatus(err.message, 'error');
            });
        });
        row.appendChild(button);
        scheduleEl.appendChild(row);
      });
    };

    const renderWater = (water) => {
      document.getElementById('water').value = water.ml;
      const bar = document.getElementById('water-bar');
      bar.style.width = `${water.percent}%`;
      bar.textContent = `${water.percent}%`;
      bar.style.background = WATER_COLORS[water.level];
    };

    const loadTracker = async () => {
      const [view, water] = await Promise.all([api('/api/schedule'), api('/api/water')]);
      renderSchedule(view);
      renderWater(water);
    };

    const showSignedIn = (signedIn) => {
      document.getElementById('login').hidden = signedIn;
      document.getElementById('tracker').hidden = !signedIn;
      if (signedIn) {
        loadTracker().catch((err) => setStatus(err.message, 'error'));
      }
    };

    document.getElementById('login-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/login', {
        email: document.getElementById('email').value.trim(),
        password: document.getElementById('password').value,
      })
        .then((session) => {
          document.getElementById('greeting').textContent = `Hello, ${session.user.name || session.user.email}`;
          setStatus('', '');
          showSignedIn(true);
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('logout').addEventListener('click', () => {
      api('/api/logout', {})
        .then(() => {
          document.getElementById('greeting').textContent = 'Welcome';
          showSignedIn(false);
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('med-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/medications', {
        name: document.getElementById('med-name').value,
        dosage: document.getElementById('med-dosage').value,
        frequency: document.getElementById('med-frequency').value,
        duration: document.getElementById('med-duration').value,
      })
        .then((out) => {
          event.target.reset();
          setStatus(out.msg, 'ok');
          return loadTracker();
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('water-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/water', { ml: Number(document.getElementById('water').value) })
        .then(renderWater)
        .catch((err) => setStatus(err.message, 'error'));
    });

    showSignedIn(document.querySelector('.app').dataset.signedIn === 'true');
  </script>
</body>
</html>
"#;
