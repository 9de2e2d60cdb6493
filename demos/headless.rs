//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
// Drives the UI without a platform or GPU: simulated input, a few frames of
// widgets, and a dump of what a graphics backend would receive.

use emberui::*;

fn build_ui(ctx: &mut Context, checked: &mut bool, speed: &mut f32, name: &mut String) {
    ctx.set_next_window_pos(Vec2f::new(40.0, 40.0), ConditionFlags::ONCE);
    ctx.set_next_window_size(Vec2f::new(420.0, 360.0), ConditionFlags::ONCE);
    if ctx.begin_window("demo", None, WindowFlags::NONE) {
        ctx.layout_dynamic(0.0, 1);
        ctx.text("widgets");
        ctx.separator();

        ctx.layout_dynamic(0.0, 2);
        if ctx.button("press me") {
            println!("button pressed");
        }
        ctx.checkbox("enabled", checked);

        ctx.layout_dynamic(0.0, 1);
        ctx.slider_float("speed", speed, 0.0, 10.0);
        ctx.input_text("name", name);

        ctx.layout_template_begin(0.0);
        ctx.layout_template_push_static(80.0);
        ctx.layout_template_push_variable(120.0);
        ctx.layout_template_push_dynamic();
        ctx.layout_template_end();
        ctx.text("fixed");
        ctx.text("at least 120");
        ctx.text("the rest");

        if ctx.collapsing_header("long list") {
            ctx.layout_dynamic(16.0, 1);
            let mut clipper = Clipper::new(100_000);
            while clipper.step(ctx) {
                for i in clipper.display_start()..clipper.display_end() {
                    ctx.text(&format!("row {}", i));
                }
            }
            ctx.end_collapsing_header();
        }
        ctx.end_window();
    }
}

fn main() {
    env_logger::init();

    let mut atlas = FontAtlas::new();
    let font = atlas.add_default_font(13.0);
    atlas.build().expect("atlas build");
    println!(
        "atlas: {}x{} px, {} glyphs",
        atlas.width(),
        atlas.height(),
        atlas.font(font).glyph_count()
    );

    let mut ctx = Context::new(FontAtlasHandle::new(atlas));
    ctx.io.main_viewport_size = Vec2f::new(1280.0, 720.0);

    let mut checked = false;
    let mut speed = 2.5f32;
    let mut name = String::from("ember");

    // a handful of frames with a click wandering onto the button
    for frame in 0..6 {
        match frame {
            2 => ctx.io.add_mouse_pos_event(Vec2f::new(160.0, 130.0)),
            3 => ctx.io.add_mouse_button_event(MouseButton::LEFT, true),
            4 => ctx.io.add_mouse_button_event(MouseButton::LEFT, false),
            _ => {}
        }
        ctx.new_frame();
        build_ui(&mut ctx, &mut checked, &mut speed, &mut name);
        ctx.render();

        let list = ctx.draw_list();
        let mut commands = 0;
        let mut indices = 0;
        for layer in list.submitted_layers() {
            commands += list.layer(*layer).commands().len();
            indices += list.layer(*layer).indices().len();
        }
        println!(
            "frame {}: {} vertices, {} indices, {} commands, cursor {:?}",
            frame,
            list.vertices().len(),
            indices,
            commands,
            ctx.io.mouse_cursor()
        );
    }

    // the freelist that backs GPU suballocation
    let mut freelist = FreeList::new(64 * 1024 * 1024, 256);
    let a = freelist.get_node(1024 * 1024).expect("fits");
    let b = freelist.get_node(4 * 1024 * 1024).expect("fits");
    freelist.return_node(a);
    println!(
        "freelist: used {} of {} across {} free ranges",
        freelist.used_space(),
        freelist.total_size(),
        freelist.free_ranges().len()
    );
    freelist.return_node(b);
}
