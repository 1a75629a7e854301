//! Bundled sample presets.

pub const SPIRAL: &str = "Init: n=800\n\
Frame: t=t-0.05\n\
Beat:\n\
Point: d=i+v*0.2; r=t+i*$PI*4; x=cos(r)*d; y=sin(r)*d";

pub const ROTATING_BOW: &str = "Init: n=80;t=0.0;\n\
Frame: t=t+0.01\n\
Beat:\n\
Point: r=i*$PI*2; d=sin(r*3)+v*0.5; x=cos(t+r)*d; y=sin(t-r)*d";

pub const VERTICAL_BOUNCE: &str = "Init: n=100; t=0; tv=0.1;dt=1;\n\
Frame: t=t*0.9+tv*0.1\n\
Beat: tv=((rand(50.0)/50.0))*dt; dt=-dt;\n\
Point: x=t+v*pow(sin(i*$PI),2); y=i*2-1.0;";

pub const VIBRATING_WORM: &str = "Init: n=400; dt=0.01; t=0; sc=1;\n\
Frame: t=t+dt;dt=0.9*dt+0.001; t=if(above(t,$PI*2),t-$PI*2,t);\n\
Beat: dt=sc;sc=-sc;\n\
Point: x=cos(2*i*6.283+t)*0.9*(v*0.5+0.5); y=sin(i*2*6.283+t)*0.9*(v*0.5+0.5);";

/// `(name, preset text)` for every bundled preset.
pub const ALL: [(&str, &str); 4] = [
    ("spiral", SPIRAL),
    ("rotating-bow", ROTATING_BOW),
    ("vertical-bounce", VERTICAL_BOUNCE),
    ("vibrating-worm", VIBRATING_WORM),
];

/// Find a bundled preset by name (case-insensitive; `_` and spaces match `-`).
pub fn find(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase().replace(['_', ' '], "-");
    ALL.iter()
        .find(|(n, _)| *n == wanted)
        .map(|(_, text)| *text)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetProgram;

    #[test]
    fn every_sample_has_point_code() {
        for (name, text) in ALL {
            let p = PresetProgram::parse(text);
            assert!(!p.point.is_empty(), "{name}");
            assert!(!p.init.is_empty(), "{name}");
        }
    }

    #[test]
    fn find_normalises_names() {
        assert_eq!(find("Spiral"), Some(SPIRAL));
        assert_eq!(find("vertical_bounce"), Some(VERTICAL_BOUNCE));
        assert_eq!(find("Vibrating Worm"), Some(VIBRATING_WORM));
        assert_eq!(find("nope"), None);
        assert_eq!(names().count(), 4);
    }
}
