//! # Renderizado de la Respuesta
//! src/render/mod.rs
//!
//! Construye los tres fragmentos concatenables de la respuesta CGI:
//!
//! 1. `PREAMBLE`: HTML fijo (head + apertura del textarea), constante en
//!    tiempo de compilación, se envía antes de que empiece a fluir la
//!    salida del hijo
//! 2. bloque de estadísticas + datos de gráfico: se construye solo cuando
//!    el hijo terminó y la secuencia de muestras está congelada
//! 3. `TRAILER`: cierre fijo del script y del documento
//!
//! El contenido HTML y el formato de los floats reproducen byte a byte los
//! resultados esperados del caso base: son un contrato con los fixtures de
//! prueba, no una elección cosmética.

use crate::stats::StatSample;

/// Fragmento 1: preámbulo HTML de tamaño conocido en compilación
pub const PREAMBLE: &str = "<html>\r\n  <head>\r\n    <script type='text/javascript' \
src='https://www.gstatic.com/charts/loader.js'></script>\r\n    \
<script type='text/javascript' src='/draw_chart.js'></script>\r\n\
    <link rel='stylesheet' type='text/css' href='/mystyle.css'>\
\r\n  </head>\r\n\r\n  <body>\r\n    <h3>Output from program</h3>\r\n\
    <textarea style='width: 700px; height: 200px'>\r\n";

/// Fragmento 3: cierre fijo del documento
pub const TRAILER: &str =
    "        ]\r\n      );\r\n    }\r\n  </script>\r\n</html>\r\n";

/// Apertura del bloque de estadísticas: cierre del textarea y cabecera de tabla
const STATS_HEAD: &str = "     </textarea>\r\n     <h2>Runtime statistics</h2>\
\r\n     <table>\r\n\
       <tr><th>Time (sec)</th><th>User time</th>\
<th>System time</th><th>Memory (KB)</th></tr>";

/// Cierre de la tabla y andamiaje del gráfico de Google Charts
const STATS_MIDDLE: &str = "\r\n     </table>\r\n     <div id='chart' style='wi\
dth: 900px; height: 500px'></div>\r\n  </body>\r\n  <script type=\
'text/javascript'>\r\n    function getChartData() {\r\n      \
return google.visualization.arrayToDataTable(\r\n        [\r\n\
          ['Time (sec)', 'CPU Usage', 'Memory Usage']";

/// Línea legible con el código de salida del hijo, enviada como un chunk
pub fn exit_code_line(code: i32) -> String {
    format!("\r\nExit code: {}\r\n", code)
}

/// Fragmento 2: tabla de estadísticas más, si se pidió gráfico, el arreglo
/// de ternas `[segundo, cpu, memoria]`.
///
/// El caller enmarca el resultado como un único chunk; la longitud declarada
/// sale del mismo buffer retornado, nunca de una aritmética aparte.
pub fn stats_block(samples: &[StatSample], chart: bool) -> String {
    let mut block = String::from(STATS_HEAD);
    for sample in samples {
        block.push_str(&format!(
            "\r\n       <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            sample.elapsed_secs,
            short_float(sample.user_time_secs),
            short_float(sample.system_time_secs),
            sample.resident_memory_kb
        ));
    }
    block.push_str(STATS_MIDDLE);
    if chart {
        block.push_str(&chart_data(samples));
    } else {
        // Sin gráfico la porción degenera en un separador vacío
        block.push_str("\r\n");
    }
    block
}

/// Arreglo de datos del gráfico: una terna por muestra, donde el tiempo de
/// CPU es usuario + kernel con el mismo formato corto de floats
fn chart_data(samples: &[StatSample]) -> String {
    let mut out = String::from(",\r\n");
    for (i, sample) in samples.iter().enumerate() {
        out.push_str(&format!(
            "          [{}, {}, {}]",
            sample.elapsed_secs,
            short_float(sample.cpu_time_secs()),
            sample.resident_memory_kb
        ));
        if i + 1 != samples.len() {
            out.push_str(",\n");
        }
    }
    out.push('\n');
    out
}

/// Acorta un float al formato de los resultados del caso base.
///
/// Un valor exactamente cero se escribe `"0"`; cualquier otro se trunca a
/// dos decimales y después se elimina un único `'0'` final si lo hay. La
/// regla se aplica una sola vez: `1.1` → `"1.1"`, `1.005` → `"1.0"`,
/// `0.25` → `"0.25"`.
///
/// # Ejemplo
/// ```
/// use cgi_server::render::short_float;
///
/// assert_eq!(short_float(0.0), "0");
/// assert_eq!(short_float(0.25), "0.25");
/// assert_eq!(short_float(1.1), "1.1");
/// ```
pub fn short_float(value: f32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    // Seis decimales como to_string de C++, truncados a dos tras el punto
    let full = format!("{:.6}", value);
    let dot = full.find('.').unwrap_or(full.len());
    let end = (dot + 3).min(full.len());
    let mut short = full[..end].to_string();
    if short.ends_with('0') {
        short.pop();
    }
    short
}
