//! Client-side behavior of the public invitation page.
//!
//! The countdown is rendered once on the server and then kept live here with
//! the same floor decomposition and clamp at zero as
//! [`domain::services::countdown::remaining`]. The top banner hides while the
//! reader scrolls down and comes back on scroll up, or within
//! [`BANNER_REVEAL_OFFSET_PX`] of the top.

pub use domain::services::countdown::BANNER_REVEAL_OFFSET_PX;

/// Path the page loads the script from.
pub const CARD_SCRIPT_PATH: &str = "/assets/card.js";

/// Class toggled on the banner while it is hidden.
pub const BANNER_HIDDEN_CLASS: &str = "top-banner-hidden";

pub const CARD_SCRIPT: &str = r#"(function () {
  "use strict";
  var DAY = 86400, HOUR = 3600, MINUTE = 60;

  function pad(n) {
    return String(n).padStart(2, "0");
  }

  function remaining(target) {
    var secs = Math.floor((target - Date.now()) / 1000);
    if (!(secs > 0)) {
      return [0, 0, 0, 0];
    }
    return [
      Math.floor(secs / DAY),
      Math.floor(secs / HOUR) % 24,
      Math.floor(secs / MINUTE) % 60,
      secs % 60
    ];
  }

  document.querySelectorAll(".countdown[data-target]").forEach(function (el) {
    var target = Date.parse(el.getAttribute("data-target"));
    if (isNaN(target)) {
      return;
    }
    var values = el.querySelectorAll(".countdown-value");
    function tick() {
      remaining(target).forEach(function (v, i) {
        if (values[i]) {
          values[i].textContent = pad(v);
        }
      });
    }
    tick();
    setInterval(tick, 1000);
  });

  var banner = document.querySelector(".top-banner[data-reveal-offset]");
  if (banner) {
    var offset = Number(banner.getAttribute("data-reveal-offset"));
    var lastY = window.scrollY;
    window.addEventListener("scroll", function () {
      var y = window.scrollY;
      var visible = y < offset || y <= lastY;
      banner.classList.toggle("top-banner-hidden", !visible);
      lastY = y;
    }, { passive: true });
  }
})();
"#;
