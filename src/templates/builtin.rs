// Built-in page templates

use std::collections::HashMap;

/// Built-in template names
pub const PAGE: &str = "page.html";

/// Get all built-in templates
pub fn get_builtin_templates() -> HashMap<String, String> {
    let mut templates = HashMap::new();
    templates.insert(PAGE.to_string(), PAGE_TEMPLATE.to_string());
    templates
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ page.title }}{% if page.body.view == "profile" %} - {{ page.body.heading }}{% endif %}</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #1f2328; }
  form { display: flex; gap: .5rem; flex-wrap: wrap; margin-bottom: 2rem; }
  input { padding: .5rem; font-size: 1rem; flex: 1 1 14rem; }
  button { padding: .5rem 1.25rem; font-size: 1rem; }
  .section { margin-bottom: 1.75rem; }
  dl { display: grid; grid-template-columns: 14rem 1fr; gap: .35rem 1rem; }
  dt { font-weight: 600; }
  .missing { color: #8c959f; font-style: italic; }
  table { border-collapse: collapse; width: 100%; }
  th, td { text-align: left; padding: .35rem .5rem; border-bottom: 1px solid #d0d7de; }
  .error-panel { border: 1px solid #cf222e; background: #ffebe9; padding: 1rem 1.25rem; border-radius: 6px; }
  .error-label { font-family: monospace; color: #cf222e; }
  footer { margin-top: 3rem; color: #8c959f; font-size: .85rem; }
</style>
</head>
<body>
<h1>{{ page.title }}</h1>
<p>Enter a company name to research its registration, ownership and contact details.</p>

<form method="post" action="/research">
  <input type="text" name="company" placeholder="Company name, e.g. Acme Corp" value="{{ page.form.company }}" required>
  <input type="text" name="country" placeholder="Country (optional)" value="{{ page.form.country }}">
  <button type="submit">Research</button>
</form>

{% if page.body.view == "profile" %}
<h2>{{ page.body.heading }}</h2>
{% for section in page.body.sections %}
<section class="section" id="{{ section.kind }}">
  <h3>{{ section.title }}</h3>
  {% if section.content.layout == "facts" %}
  <dl>
    {% for row in section.content.rows %}
    <dt>{{ row.label }}</dt>
    <dd{% if not row.available %} class="missing"{% endif %}>{{ row.value }}</dd>
    {% endfor %}
  </dl>
  {% elif section.content.layout == "table" %}
  {% if section.content.placeholder %}
  <p class="missing">{{ section.content.placeholder }}</p>
  {% else %}
  <table>
    <thead><tr><th>#</th><th>{{ section.content.column }}</th></tr></thead>
    <tbody>
      {% for name in section.content.rows %}
      <tr class="row"><td>{{ loop.index }}</td><td>{{ name }}</td></tr>
      {% endfor %}
    </tbody>
  </table>
  {% endif %}
  {% elif section.content.layout == "links" %}
  {% if section.content.placeholder %}
  <p class="missing">{{ section.content.placeholder }}</p>
  {% else %}
  <ol>
    {% for link in section.content.links %}
    <li class="reference"><a href="{{ link.href }}" rel="noopener noreferrer" target="_blank">{{ link.text }}</a></li>
    {% endfor %}
  </ol>
  {% endif %}
  {% endif %}
</section>
{% endfor %}
{% elif page.body.view == "error" %}
<div class="error-panel" role="alert">
  <h2>{{ page.body.title }}</h2>
  <p><span class="error-label">{{ page.body.label }}</span>: {{ page.body.message }}</p>
  <p>{{ page.body.suggestion }}</p>
  <p><small>Request id: {{ page.body.request_id }}</small></p>
</div>
{% endif %}

<footer>Generated {{ page.generated_at }}</footer>
</body>
</html>
"#;
