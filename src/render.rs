use crate::form_controller::{FormState, Outcome};
use crate::options::DropdownOptions;

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

fn render_select(html: &mut String, name: &str, label: &str, options: &[String], selected: &str) {
    html.push_str(&format!(
        "    <label for=\"{name}\">{}</label>\n    <select id=\"{name}\" name=\"{name}\">\n",
        html_escape(label)
    ));
    for option in options {
        let marker = if option == selected { " selected" } else { "" };
        let escaped = html_escape(option);
        html.push_str(&format!(
            "      <option value=\"{escaped}\"{marker}>{escaped}</option>\n"
        ));
    }
    html.push_str("    </select>\n");
}

/// Full page for the current form state.
pub fn render_page(state: &FormState, options: &DropdownOptions) -> String {
    let values = &state.values;
    let mut html = String::new();

    html.push_str(
        "<!doctype html>\n<html lang=\"es\">\n<head>\n  <meta charset=\"utf-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    html.push_str("  <title>Prediccion de arancel</title>\n");
    html.push_str(
        "  <style>\n    body { font-family: sans-serif; max-width: 32rem; margin: 2rem auto; }\n    label, select, input { display: block; width: 100%; margin-bottom: 0.75rem; }\n    .result { padding: 0.75rem; background: #e8f5e9; }\n    .error { padding: 0.75rem; background: #ffebee; }\n  </style>\n",
    );
    html.push_str("</head>\n<body>\n  <h1>Prediccion de arancel</h1>\n");
    html.push_str("  <form method=\"post\" action=\"/\">\n");

    render_select(&mut html, "tipo_pu_pr", "Tipo PU/PR", &options.tipo_pu_pr, &values.tipo_pu_pr);
    render_select(&mut html, "estado", "Estado", &options.estado, &values.estado);
    render_select(&mut html, "tipo_predio", "Tipo de predio", &options.tipo_predio, &values.tipo_predio);
    render_select(&mut html, "sector", "Sector", &options.sector, &values.sector);

    html.push_str(&format!(
        "    <label for=\"terreno\">Terreno</label>\n    <input id=\"terreno\" name=\"terreno\" type=\"text\" value=\"{}\">\n",
        html_escape(&values.terreno)
    ));
    html.push_str("    <button type=\"submit\">Calcular</button>\n  </form>\n");

    match &state.outcome {
        Some(Outcome::Prediction(arancel)) => html.push_str(&format!(
            "  <p class=\"result\">Arancel estimado: <strong id=\"prediction\">{arancel:.2}</strong></p>\n"
        )),
        Some(Outcome::Error(message)) => html.push_str(&format!(
            "  <p class=\"error\" id=\"error\">{}</p>\n",
            html_escape(message)
        )),
        None => {}
    }

    html.push_str("</body>\n</html>\n");
    html
}
