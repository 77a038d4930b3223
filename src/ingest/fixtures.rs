/// Test fixtures: representative payloads from each collaborator.
///
/// JSON bodies are trimmed to the fields the parsers read plus enough
/// surrounding structure to prove unknown fields are ignored. The two
/// narrative texts mimic typical model replies, including the noise
/// (preambles, markdown emphasis, repeated sections) the extractor must
/// tolerate.
///
/// OpenCage response shape:
///   results[]
///     .components.{city | town | village}, .state, .postcode
///     .formatted
///     .geometry.{lat, lng}
///
/// OpenWeather response shape:
///   main.{temp, humidity}, weather[0].main, wind.speed, rain."1h" (optional)
///
/// OpenAI chat response shape:
///   choices[0].message.content

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

/// Single city match for "San Francisco".
#[cfg(test)]
pub(crate) fn fixture_opencage_city_json() -> &'static str {
    r#"{
      "documentation": "https://opencagedata.com/api",
      "licenses": [{ "name": "see attribution guide", "url": "https://opencagedata.com/credits" }],
      "results": [
        {
          "components": {
            "ISO_3166-1_alpha-2": "US",
            "_type": "city",
            "city": "San Francisco",
            "country": "United States",
            "county": "San Francisco City and County",
            "postcode": "94103",
            "state": "California",
            "state_code": "CA"
          },
          "confidence": 4,
          "formatted": "San Francisco, CA 94103, United States of America",
          "geometry": { "lat": 37.7749, "lng": -122.4194 }
        }
      ],
      "status": { "code": 200, "message": "OK" },
      "total_results": 1
    }"#
}

/// Smaller settlement: locality reported as `town`, no postcode.
#[cfg(test)]
pub(crate) fn fixture_opencage_town_json() -> &'static str {
    r#"{
      "results": [
        {
          "components": {
            "_type": "town",
            "town": "Moore",
            "county": "Cleveland County",
            "state": "Oklahoma",
            "country": "United States"
          },
          "formatted": "Moore, OK, United States of America",
          "geometry": { "lat": 35.3395, "lng": -97.4867 }
        }
      ],
      "status": { "code": 200, "message": "OK" },
      "total_results": 1
    }"#
}

/// Unresolvable query.
#[cfg(test)]
pub(crate) fn fixture_opencage_no_results_json() -> &'static str {
    r#"{
      "results": [],
      "status": { "code": 200, "message": "OK" },
      "total_results": 0
    }"#
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Houston during a rain band.
#[cfg(test)]
pub(crate) fn fixture_openweather_rain_json() -> &'static str {
    r#"{
      "coord": { "lon": -95.3698, "lat": 29.7604 },
      "weather": [{ "id": 501, "main": "Rain", "description": "moderate rain", "icon": "10d" }],
      "main": { "temp": 78.4, "feels_like": 80.1, "pressure": 1009, "humidity": 88 },
      "wind": { "speed": 14.2, "deg": 160 },
      "rain": { "1h": 0.31 },
      "name": "Houston",
      "cod": 200
    }"#
}

/// Phoenix on a clear afternoon; no rain block.
#[cfg(test)]
pub(crate) fn fixture_openweather_clear_json() -> &'static str {
    r#"{
      "coord": { "lon": -112.074, "lat": 33.4484 },
      "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
      "main": { "temp": 104.2, "humidity": 9 },
      "wind": { "speed": 6.9 },
      "name": "Phoenix",
      "cod": 200
    }"#
}

// ---------------------------------------------------------------------------
// Generative model
// ---------------------------------------------------------------------------

/// Chat completion whose content is a structured risk object.
#[cfg(test)]
pub(crate) fn fixture_openai_chat_json() -> &'static str {
    r#"{
      "id": "chatcmpl-9x1",
      "object": "chat.completion",
      "model": "gpt-3.5-turbo-0125",
      "choices": [
        {
          "index": 0,
          "message": {
            "role": "assistant",
            "content": "{\"risks\": [{\"disaster\": \"earthquake\", \"level\": \"high\", \"explanation\": \"Active faults nearby\"}]}"
          },
          "finish_reason": "stop"
        }
      ],
      "usage": { "prompt_tokens": 212, "completion_tokens": 31, "total_tokens": 243 }
    }"#
}

/// Free-text risk analysis for San Francisco. Earthquake appears twice with
/// different levels; labels use aliases and markdown emphasis.
#[cfg(test)]
pub(crate) fn fixture_risk_analysis_text() -> &'static str {
    "Based on the location data for San Francisco, here is the risk analysis.\n\
     \n\
     Earthquake: High - The city sits between the San Andreas and Hayward faults.\n\
     A major quake within the next 30 years is likely.\n\
     \n\
     Winter Storms: medium - Atmospheric rivers bring heavy rain and wind, though snow is rare.\n\
     \n\
     **Heat Wave** - Low. Marine air keeps summer temperatures mild.\n\
     \n\
     Tsunami: Medium - Low-lying areas along the Embarcadero could see surge from a distant quake.\n\
     \n\
     Earthquake: low - this repeated entry should be ignored.\n\
     \n\
     Stay prepared!"
}

/// Free-text preparations in the five numbered sections.
#[cfg(test)]
pub(crate) fn fixture_preparations_text() -> &'static str {
    "Here is your preparedness plan for San Francisco.\n\
     \n\
     1. Immediate Actions:\n\
     - Sign up for county emergency alerts\n\
     - Fill prescriptions\n\
     \n\
     2. Short-term Preparations:\n\
     • Secure bookshelves to wall studs\n\
     * Practice Drop, Cover, and Hold On\n\
     \n\
     3. Long-term Planning:\n\
     - Retrofit the foundation\n\
     \n\
     4. Emergency Supplies:\n\
     Category: Water & Food\n\
     - 1 gallon of water per person per day (essential)\n\
     - Canned goods with a manual opener (recommended)\n\
     Category: Tools\n\
     - Adjustable wrench for gas shutoff\n\
     \n\
     5. Location-Specific Considerations:\n\
     - Liquefaction zones exist near the bay shore\n"
}
