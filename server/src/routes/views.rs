//! Server-rendered pages. Static markup with light interpolation; no
//! template engine.

const STYLE: &str = "body{font-family:sans-serif;max-width:640px;margin:2em auto;padding:0 1em}\
nav a{margin-right:1em}.error{color:#b00}#result{margin-top:1em;line-height:1.5}";

pub fn landing_page(username: Option<&str>) -> String {
    let nav = match username {
        Some(name) => format!(
            "Logged in as <b>{name}</b> | <a href=\"/logout\">Logout</a>"
        ),
        None => "<a href=\"/login\">Login</a> <a href=\"/register\">Register</a>".to_string(),
    };
    format!(
        r#"<!doctype html>
<html>
<head><title>Flowcast</title><style>{STYLE}</style></head>
<body>
<h1>Flowcast</h1>
<nav>{nav}</nav>
<p>Traffic estimates two ways:</p>
<ul>
<li><a href="/ai-based-prediction">Live narrative for your location</a></li>
<li><a href="/data-based-prediction">Vehicle count for a junction and time</a></li>
</ul>
</body>
</html>"#
    )
}

pub fn login_page(error: Option<&str>) -> String {
    auth_page("Login", "/login", "Login", error, Some(("/register", "Need an account? Register")))
}

pub fn register_page(error: Option<&str>) -> String {
    auth_page(
        "Register",
        "/register",
        "Create account",
        error,
        Some(("/login", "Already registered? Login")),
    )
}

fn auth_page(
    title: &str,
    action: &str,
    submit: &str,
    error: Option<&str>,
    alt: Option<(&str, &str)>,
) -> String {
    let error_line = error
        .map(|e| format!("<p class=\"error\">{e}</p>"))
        .unwrap_or_default();
    let alt_line = alt
        .map(|(href, text)| format!("<p><a href=\"{href}\">{text}</a></p>"))
        .unwrap_or_default();
    format!(
        r#"<!doctype html>
<html>
<head><title>{title} - Flowcast</title><style>{STYLE}</style></head>
<body>
<h1>{title}</h1>
{error_line}
<form method="post" action="{action}">
<p><label>Username <input name="username" required></label></p>
<p><label>Password <input name="password" type="password" required></label></p>
<p><button type="submit">{submit}</button></p>
</form>
{alt_line}
</body>
</html>"#
    )
}

pub const AI_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Live traffic - Flowcast</title>
<style>body{font-family:sans-serif;max-width:640px;margin:2em auto;padding:0 1em}#result{margin-top:1em;line-height:1.5}</style>
</head>
<body>
<h1>Live traffic near you</h1>
<p><a href="/">Back</a></p>
<button id="locate">Use my location</button>
<div id="result"></div>
<script>
document.getElementById('locate').addEventListener('click', function () {
  var result = document.getElementById('result');
  result.textContent = 'Locating...';
  navigator.geolocation.getCurrentPosition(function (pos) {
    result.textContent = 'Fetching traffic...';
    fetch('/get-traffic', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ latitude: pos.coords.latitude, longitude: pos.coords.longitude })
    })
      .then(function (r) { return r.json(); })
      .then(function (data) { result.innerHTML = data.traffic || data.error; })
      .catch(function () { result.textContent = 'Request failed'; });
  }, function () {
    result.textContent = 'Location unavailable';
  });
});
</script>
</body>
</html>"#;

pub const DATA_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Junction forecast - Flowcast</title>
<style>body{font-family:sans-serif;max-width:640px;margin:2em auto;padding:0 1em}#result{margin-top:1em}</style>
</head>
<body>
<h1>Junction vehicle count</h1>
<p><a href="/">Back</a></p>
<form id="predict">
<p><label>Date and time <input name="datetime" type="datetime-local" required></label></p>
<p><label>Junction <input name="junction" type="number" required></label></p>
<p><button type="submit">Predict</button></p>
</form>
<div id="result"></div>
<script>
document.getElementById('predict').addEventListener('submit', function (e) {
  e.preventDefault();
  var result = document.getElementById('result');
  fetch('/predict-traffic', {
    method: 'POST',
    headers: { 'Content-Type': 'application/x-www-form-urlencoded' },
    body: new URLSearchParams(new FormData(e.target))
  })
    .then(function (r) { return r.json(); })
    .then(function (data) {
      result.textContent = 'error' in data
        ? 'Error: ' + data.error
        : 'Predicted vehicles: ' + data.prediction;
    })
    .catch(function () { result.textContent = 'Request failed'; });
});
</script>
</body>
</html>"#;
